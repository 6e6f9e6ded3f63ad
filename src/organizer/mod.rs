//! Organizers: the user-visible containers (calendars, task lists) of an account

pub mod color;
pub mod node;
pub mod share;
pub mod sort;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::config::MAX_NAME_LENGTH;
use crate::error::OrganizerError;

/// Characters the server refuses in an organizer name
const INVALID_NAME_CHARS: &[char] = &[':', '/', '"'];


/// A server-assigned organizer ID
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizerId(String);

impl OrganizerId {
    /// The invisible root of every organizer tree
    pub const ROOT: &'static str = "1";
    /// The default calendar every account has
    pub const CALENDAR: &'static str = "10";
    /// The default task list every account has
    pub const TASKS: &'static str = "15";

    pub fn root() -> Self {
        Self::from(Self::ROOT)
    }

    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrganizerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
impl From<String> for OrganizerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for OrganizerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}


/// The kind of items an organizer tree holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewType {
    Calendar,
    Task,
}

impl ViewType {
    /// The `view` tag the server uses for folders of this type
    pub fn as_tag(&self) -> &'static str {
        match self {
            ViewType::Calendar => "appointment",
            ViewType::Task => "task",
        }
    }

    pub fn matches_tag(&self, tag: Option<&str>) -> bool {
        tag == Some(self.as_tag())
    }
}


/// Organizer kinds, with the fields only one kind has
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OrganizerKind {
    Calendar {
        /// Whether the appointments of this calendar are hidden from free/busy lookups
        exclude_free_busy: bool,
    },
    TaskList,
}

impl OrganizerKind {
    /// The kind a new organizer of this view gets, before any subtype field is known
    pub fn for_view(view: ViewType) -> Self {
        match view {
            ViewType::Calendar => OrganizerKind::Calendar { exclude_free_busy: false },
            ViewType::Task => OrganizerKind::TaskList,
        }
    }

    pub fn view(&self) -> ViewType {
        match self {
            OrganizerKind::Calendar { .. } => ViewType::Calendar,
            OrganizerKind::TaskList => ViewType::Task,
        }
    }
}


/// Identifies the icon a UI should show next to an organizer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconKey {
    CalendarFolder,
    GroupSchedule,
    TaskList,
    SharedTaskList,
}

impl IconKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKey::CalendarFolder => "CalendarFolder",
            IconKey::GroupSchedule => "GroupSchedule",
            IconKey::TaskList => "TaskList",
            IconKey::SharedTaskList => "SharedTaskList",
        }
    }
}


/// Checks a user-provided organizer name before it is sent to the server
pub fn check_name(name: &str) -> Result<(), OrganizerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(OrganizerError::InvalidName("name is empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(OrganizerError::InvalidName(format!("name is longer than {} characters", MAX_NAME_LENGTH)));
    }
    if let Some(c) = trimmed.chars().find(|c| INVALID_NAME_CHARS.contains(c)) {
        return Err(OrganizerError::InvalidName(format!("name contains the invalid character {:?}", c)));
    }
    Ok(())
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_check_name() {
        assert!(check_name("Work").is_ok());
        assert!(check_name("  Holidays 2024 ").is_ok());

        assert_eq!(check_name("   "), Err(OrganizerError::InvalidName("name is empty".to_string())));
        assert!(check_name("a/b").is_err());
        assert!(check_name("a:b").is_err());
        assert!(check_name("\"quoted\"").is_err());

        let long_name: String = std::iter::repeat('x').take(MAX_NAME_LENGTH + 1).collect();
        assert!(check_name(&long_name).is_err());
        let max_name: String = std::iter::repeat('x').take(MAX_NAME_LENGTH).collect();
        assert!(check_name(&max_name).is_ok());
    }

    #[test]
    fn test_view_tags() {
        assert!(ViewType::Calendar.matches_tag(Some("appointment")));
        assert!(ViewType::Calendar.matches_tag(Some("task")) == false);
        assert!(ViewType::Task.matches_tag(None) == false);
        assert_eq!(OrganizerKind::for_view(ViewType::Task).view(), ViewType::Task);
    }
}
