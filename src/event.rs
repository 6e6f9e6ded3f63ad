//! Events raised when the organizer tree changes

use std::collections::HashSet;
use std::fmt::{Display, Error, Formatter};

use crate::organizer::OrganizerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Create,
    Modify,
    Move,
    Delete,
}

/// An organizer field that changed during a modification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Color,
    Parent,
    ExcludeFreeBusy,
}

/// Something that happened to an organizer of the tree
#[derive(Clone, Debug, PartialEq)]
pub struct OrganizerEvent {
    pub event_type: EventType,
    pub organizer: OrganizerId,
    /// For [`EventType::Modify`], the fields that changed, so that listeners only refresh what they need
    pub fields: HashSet<Field>,
}

impl OrganizerEvent {
    pub fn new(event_type: EventType, organizer: OrganizerId) -> Self {
        Self { event_type, organizer, fields: HashSet::new() }
    }

    pub fn modified(organizer: OrganizerId, fields: HashSet<Field>) -> Self {
        Self { event_type: EventType::Modify, organizer, fields }
    }
}

impl Display for OrganizerEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self.event_type {
            EventType::Create => write!(f, "[{}] created", self.organizer),
            EventType::Modify => write!(f, "[{}] modified {:?}", self.organizer, self.fields),
            EventType::Move => write!(f, "[{}] moved", self.organizer),
            EventType::Delete => write!(f, "[{}] deleted", self.organizer),
        }
    }
}


/// See [`event_channel`]
pub type EventSender = tokio::sync::mpsc::UnboundedSender<OrganizerEvent>;
/// See [`event_channel`]
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<OrganizerEvent>;

/// Create a channel, that can be registered as a listener of an [`OrganizerTree`](crate::tree::OrganizerTree)
pub fn event_channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
