use std::error::Error;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::organizer::OrganizerId;
use crate::payload::{CreateFolderRequest, FolderPayload, OrganizerAction};

/// A way to send organizer requests to the server
///
/// Requests are fire-and-forget: their effect is reported later, by notifications that should be applied to the [`OrganizerTree`](crate::tree::OrganizerTree).
#[async_trait]
pub trait OrganizerTransport {
    /// Run an action (rename, move, change free/busy setting...) on an existing organizer
    async fn organizer_action(&self, id: &OrganizerId, action: &OrganizerAction) -> Result<(), Box<dyn Error>>;

    /// Create a new organizer, and return it as described by the server
    async fn create_folder(&self, request: &CreateFolderRequest) -> Result<FolderPayload, Box<dyn Error>>;
}

pub trait SyncSlave {
    /// Returns the last time this source successfully synced from a master source (e.g. from a server)
    /// (or None in case it has never been synchronized)
    fn get_last_sync(&self) -> Option<DateTime<Utc>>;
    /// Update the last sync timestamp to now, or to a custom time in case `timepoint` is `Some`
    fn update_last_sync(&mut self, timepoint: Option<DateTime<Utc>>);
}
