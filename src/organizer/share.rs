//! Share grants attached to an organizer

use serde::{Deserialize, Serialize};

use bitflags::bitflags;

bitflags! {
    #[derive(Serialize, Deserialize)]
    pub struct Permissions: u8 {
        /// See the content of the organizer
        const READ = 1;
        /// Edit items
        const WRITE = 2;
        /// Add items
        const INSERT = 4;
        /// Remove items
        const DELETE = 8;
        /// Act on items (e.g. accept invites on behalf of the owner)
        const ACTION = 16;
        /// Change the sharing of the organizer itself
        const ADMINISTER = 32;
    }
}

const PERMISSION_LETTERS: [(char, Permissions); 6] = [
    ('r', Permissions::READ),
    ('w', Permissions::WRITE),
    ('i', Permissions::INSERT),
    ('d', Permissions::DELETE),
    ('x', Permissions::ACTION),
    ('a', Permissions::ADMINISTER),
];

impl Permissions {
    /// Parse the letter form the server uses in ACLs, e.g. `rwid`
    pub fn from_letters(letters: &str) -> Self {
        let mut flags = Self::empty();
        for c in letters.chars() {
            match PERMISSION_LETTERS.iter().find(|(letter, _)| *letter == c) {
                Some((_, flag)) => flags.insert(*flag),
                None => log::warn!("Unknown permission letter {:?}. Ignoring it", c),
            }
        }
        flags
    }

    pub fn to_letters(&self) -> String {
        PERMISSION_LETTERS.iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(letter, _)| *letter)
            .collect()
    }
}


/// A grant of some permissions on an organizer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Share {
    /// e.g. `usr`, `grp`, `pub`
    grantee_type: Option<String>,
    grantee_id: Option<String>,
    grantee_name: Option<String>,
    permissions: Permissions,
}

impl Share {
    pub fn new(grantee_type: Option<String>, grantee_id: Option<String>, grantee_name: Option<String>, permissions: Permissions) -> Self {
        Self { grantee_type, grantee_id, grantee_name, permissions }
    }

    /// A share that names no grantee, as used for links to someone else's organizer
    pub fn anonymous(permissions: Permissions) -> Self {
        Self::new(None, None, None, permissions)
    }

    pub fn grantee_type(&self) -> Option<&str> { self.grantee_type.as_deref() }
    pub fn grantee_id(&self) -> Option<&str>   { self.grantee_id.as_deref()   }
    pub fn grantee_name(&self) -> Option<&str> { self.grantee_name.as_deref() }
    pub fn permissions(&self) -> Permissions   { self.permissions             }

    pub fn set_permissions(&mut self, permissions: Permissions) {
        self.permissions = permissions;
    }
}
