//! A node of an organizer tree

use std::borrow::Cow;
use std::error::Error;

use url::Url;

use crate::organizer::{check_name, IconKey, OrganizerId, OrganizerKind, ViewType};
use crate::organizer::color::Color;
use crate::organizer::share::{Permissions, Share};
use crate::payload::{CreateFolderRequest, FolderPayload, OrganizerAction};
use crate::traits::OrganizerTransport;


/// An organizer (e.g. a calendar), as stored in an [`OrganizerTree`](crate::tree::OrganizerTree)
///
/// The remote mutators (e.g. [`Self::set_free_busy_exclusion`]) only send a request to the server.
/// They never change the local state: the server answers with a notification, that the tree applies.
#[derive(Clone, Debug, PartialEq)]
pub struct OrganizerNode {
    id: OrganizerId,
    name: String,
    pub(crate) parent: Option<OrganizerId>,
    /// Always sorted according to [`sort_compare`](crate::organizer::sort::sort_compare)
    pub(crate) children: Vec<OrganizerId>,
    color: Color,
    is_link: bool,
    url: Option<Url>,
    owner: Option<String>,
    shares: Vec<Share>,
    kind: OrganizerKind,
}

impl OrganizerNode {
    /// Create a node that is not part of any tree yet
    pub fn new(id: OrganizerId, name: String, parent: Option<OrganizerId>, color: Option<Color>, is_link: bool, kind: OrganizerKind) -> Self {
        Self {
            id, name, parent,
            children: Vec::new(),
            color: color.unwrap_or_default(),
            is_link,
            url: None,
            owner: None,
            shares: Vec::new(),
            kind,
        }
    }

    pub fn id(&self) -> &OrganizerId            { &self.id                }
    pub fn parent(&self) -> Option<&OrganizerId> { self.parent.as_ref()   }
    pub fn children(&self) -> &[OrganizerId]    { &self.children          }
    pub fn color(&self) -> Color                { self.color              }
    pub fn is_link(&self) -> bool               { self.is_link            }
    pub fn url(&self) -> Option<&Url>           { self.url.as_ref()       }
    pub fn owner(&self) -> Option<&str>         { self.owner.as_deref()   }
    pub fn shares(&self) -> &[Share]            { &self.shares            }
    pub fn kind(&self) -> &OrganizerKind        { &self.kind              }
    pub fn view(&self) -> ViewType              { self.kind.view()        }

    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    /// The name to display. The root has no name of its own, a localized label is used instead.
    pub fn name(&self) -> Cow<'_, str> {
        if self.is_root() {
            Cow::Owned(crate::config::root_name(self.view()))
        } else {
            Cow::Borrowed(&self.name)
        }
    }

    pub fn icon_key(&self) -> Option<IconKey> {
        if self.is_root() {
            return None;
        }
        let icon = match (&self.kind, self.is_link) {
            (OrganizerKind::Calendar{ .. }, false) => IconKey::CalendarFolder,
            (OrganizerKind::Calendar{ .. }, true) => IconKey::GroupSchedule,
            (OrganizerKind::TaskList, false) => IconKey::TaskList,
            (OrganizerKind::TaskList, true) => IconKey::SharedTaskList,
        };
        Some(icon)
    }

    /// Whether this calendar is hidden from free/busy lookups (always `false` for other kinds)
    pub fn exclude_free_busy(&self) -> bool {
        match self.kind {
            OrganizerKind::Calendar{ exclude_free_busy } => exclude_free_busy,
            _ => false,
        }
    }

    /// Set the permissions of this organizer.
    ///
    /// Links only carry the share that gives us access, so only the first share is ever updated.
    pub fn set_permission(&mut self, permissions: Permissions) {
        match self.shares.first_mut() {
            None => self.shares.push(Share::anonymous(permissions)),
            Some(share) => share.set_permissions(permissions),
        }
    }

    pub(crate) fn set_name(&mut self, name: String)     { self.name = name;             }
    pub(crate) fn set_color(&mut self, color: Color)    { self.color = color;           }
    pub(crate) fn set_url(&mut self, url: Option<Url>)  { self.url = url;               }
    pub(crate) fn set_owner(&mut self, owner: Option<String>) { self.owner = owner;     }
    pub(crate) fn add_share(&mut self, share: Share)    { self.shares.push(share);      }
    pub(crate) fn kind_mut(&mut self) -> &mut OrganizerKind { &mut self.kind            }
    pub(crate) fn raw_name(&self) -> &str               { &self.name                    }


    /// Ask the server to include or exclude this calendar from free/busy lookups.
    ///
    /// Returns whether a request has been sent (nothing is sent when the calendar is already in the requested state).
    /// The local value is only updated once the server notifies the change.
    pub async fn set_free_busy_exclusion<T>(&self, exclude: bool, transport: &T) -> Result<bool, Box<dyn Error>>
    where
        T: OrganizerTransport + ?Sized,
    {
        match self.kind {
            OrganizerKind::Calendar{ exclude_free_busy } => {
                if exclude_free_busy == exclude {
                    log::debug!("Calendar {} already has excludeFreeBusy={}", self.id, exclude);
                    return Ok(false);
                }
            },
            _ => return Err(format!("Organizer {} is not a calendar, it has no free/busy setting", self.id).into()),
        }

        let value = if exclude { "1" } else { "0" };
        self.organizer_action(OrganizerAction::new("fb").with_attr("excludeFreeBusy", value), transport).await?;
        Ok(true)
    }

    /// Ask the server to rename this organizer
    pub async fn rename<T>(&self, new_name: &str, transport: &T) -> Result<bool, Box<dyn Error>>
    where
        T: OrganizerTransport + ?Sized,
    {
        if self.name == new_name {
            return Ok(false);
        }
        check_name(new_name)?;
        self.organizer_action(OrganizerAction::new("rename").with_attr("name", new_name), transport).await?;
        Ok(true)
    }

    /// Ask the server to change the color of this organizer
    pub async fn change_color<T>(&self, color: Color, transport: &T) -> Result<bool, Box<dyn Error>>
    where
        T: OrganizerTransport + ?Sized,
    {
        if self.color == color {
            return Ok(false);
        }
        let number = u8::from(color).to_string();
        self.organizer_action(OrganizerAction::new("color").with_attr("color", &number), transport).await?;
        Ok(true)
    }

    /// Ask the server to move this organizer under another one
    pub async fn move_to<T>(&self, new_parent: &OrganizerId, transport: &T) -> Result<bool, Box<dyn Error>>
    where
        T: OrganizerTransport + ?Sized,
    {
        if self.parent.as_ref() == Some(new_parent) {
            return Ok(false);
        }
        if new_parent == &self.id {
            return Err(format!("Cannot move organizer {} into itself", self.id).into());
        }
        self.organizer_action(OrganizerAction::new("move").with_attr("l", new_parent.as_str()), transport).await?;
        Ok(true)
    }

    /// Ask the server to delete this organizer
    pub async fn delete<T>(&self, transport: &T) -> Result<(), Box<dyn Error>>
    where
        T: OrganizerTransport + ?Sized,
    {
        if self.is_root() {
            return Err(crate::error::OrganizerError::CannotDeleteRoot.into());
        }
        self.organizer_action(OrganizerAction::new("delete"), transport).await
    }

    async fn organizer_action<T>(&self, action: OrganizerAction, transport: &T) -> Result<(), Box<dyn Error>>
    where
        T: OrganizerTransport + ?Sized,
    {
        log::info!("Sending action {:?} for organizer {}", action.action(), self.id);
        transport.organizer_action(&self.id, &action).await
    }


    /// Ask the server to create a new organizer.
    ///
    /// The new organizer will appear in the tree once the server notifies its creation.
    /// Caller is responsible for handling errors.
    pub async fn create<T>(transport: &T, view: ViewType, name: &str, parent: Option<&OrganizerId>, url: Option<&Url>) -> Result<FolderPayload, Box<dyn Error>>
    where
        T: OrganizerTransport + ?Sized,
    {
        check_name(name)?;
        let parent_id = parent.cloned().unwrap_or_else(OrganizerId::root);
        let request = CreateFolderRequest::new(name.to_string(), parent_id, view, url.cloned());
        log::info!("Creating organizer {:?} under {}", name, request.parent_id());
        transport.create_folder(&request).await
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn calendar(id: &str, is_link: bool) -> OrganizerNode {
        OrganizerNode::new(OrganizerId::from(id), "Work".to_string(), Some(OrganizerId::root()), None, is_link,
                           OrganizerKind::Calendar { exclude_free_busy: false })
    }

    #[test]
    fn test_names_and_icons() {
        let root = OrganizerNode::new(OrganizerId::root(), "USER_ROOT".to_string(), None, None, false, OrganizerKind::for_view(ViewType::Calendar));
        assert_eq!(root.name(), crate::config::root_name(ViewType::Calendar));
        assert_eq!(root.icon_key(), None);

        assert_eq!(calendar("300", false).name(), "Work");
        assert_eq!(calendar("300", false).icon_key(), Some(IconKey::CalendarFolder));
        assert_eq!(calendar("301", true).icon_key(), Some(IconKey::GroupSchedule));

        let tasks = OrganizerNode::new(OrganizerId::from("302"), "Chores".to_string(), None, None, true, OrganizerKind::TaskList);
        assert_eq!(tasks.icon_key(), Some(IconKey::SharedTaskList));
    }

    #[test]
    fn test_default_color() {
        assert_eq!(calendar("300", false).color(), Color::default());
        let blue = OrganizerNode::new(OrganizerId::from("301"), "Blue".to_string(), None, Some(Color::Blue), false, OrganizerKind::TaskList);
        assert_eq!(blue.color(), Color::Blue);
    }

    #[test]
    fn test_set_permission() {
        let mut cal = calendar("300", true);
        assert!(cal.shares().is_empty());

        cal.set_permission(Permissions::from_bits_truncate(4));
        assert_eq!(cal.shares().len(), 1);
        assert_eq!(cal.shares()[0].permissions().bits(), 4);
        assert_eq!(cal.shares()[0].grantee_id(), None);

        cal.set_permission(Permissions::from_bits_truncate(6));
        assert_eq!(cal.shares().len(), 1);
        assert_eq!(cal.shares()[0].permissions().bits(), 6);
    }
}
