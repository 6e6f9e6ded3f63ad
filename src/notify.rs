//! Routing of server notifications to an organizer tree
//!
//! The server piggybacks a notification block on its responses, describing what has been created, modified or deleted since the last one.

use std::convert::TryFrom;
use std::error::Error;

use minidom::Element;
use serde::{Deserialize, Serialize};

use crate::organizer::OrganizerId;
use crate::payload::FolderPayload;
use crate::tree::OrganizerTree;

/// A set of changes, in the order the server applied them
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<FolderList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<FolderList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<DeletedIds>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderList {
    #[serde(default)]
    pub folder: Vec<FolderPayload>,
    #[serde(default)]
    pub link: Vec<FolderPayload>,
}

/// IDs of deleted objects. These are not necessarily organizers (e.g. deleted messages)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeletedIds {
    /// Comma-separated list
    pub id: String,
}

impl DeletedIds {
    pub fn ids(&self) -> Vec<OrganizerId> {
        self.id.split(',')
            .map(str::trim)
            .filter(|id| id.is_empty() == false)
            .map(OrganizerId::from)
            .collect()
    }
}


impl TryFrom<&Element> for NotifyBlock {
    type Error = Box<dyn Error>;

    /// Create an instance from an XML `<notify>` element
    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        if element.name() != "notify" {
            return Err(format!("Element must be a <notify>, not a <{}>", element.name()).into());
        }

        let mut block = NotifyBlock::default();
        for child in element.children() {
            match child.name() {
                "created" => block.created = Some(FolderList::try_from(child)?),
                "modified" => block.modified = Some(FolderList::try_from(child)?),
                "deleted" => block.deleted = child.attr("id").map(|ids| DeletedIds { id: ids.to_string() }),
                _ => continue,
            }
        }
        Ok(block)
    }
}

impl TryFrom<&Element> for FolderList {
    type Error = Box<dyn Error>;

    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        let mut list = FolderList::default();
        for child in element.children() {
            match child.name() {
                "folder" => list.folder.push(FolderPayload::try_from(child)?),
                "link" => list.link.push(FolderPayload::try_from(child)?),
                // messages, appointments... are not our business
                _ => continue,
            }
        }
        Ok(list)
    }
}


/// Counts the errors that happen while applying a notification block
struct NotifyProgress {
    n_errors: u32,
}
impl NotifyProgress {
    fn new() -> Self {
        Self { n_errors: 0 }
    }
    fn is_success(&self) -> bool {
        self.n_errors == 0
    }
    fn warn(&mut self, text: &str) {
        log::warn!("{}", text);
        self.n_errors += 1;
    }
    fn debug(&mut self, text: &str) {
        log::debug!("{}", text);
    }
}


/// Apply the organizer changes of a notification block to `tree`: creations, then modifications, then deletions.
///
/// It returns whether every change could be applied (details about errors are logged using the `log::*` macros).
/// Changes that do not concern this tree (other views, unknown IDs) are skipped and are not errors.
pub fn apply_notifications(tree: &mut OrganizerTree, block: &NotifyBlock) -> bool {
    let mut progress = NotifyProgress::new();

    if let Some(created) = &block.created {
        let owned = created.folder.iter().map(|payload| (payload, false));
        let links = created.link.iter().map(|payload| (payload, true));
        for (payload, is_link) in owned.chain(links) {
            if payload.is_view(tree.view()) == false {
                progress.debug(&format!("Skipping creation of {:?}, it is not a {:?} organizer", payload.id, tree.view()));
                continue;
            }
            let parent = payload.parent_id.clone().unwrap_or_else(OrganizerId::root);
            match tree.notify_create(&parent, payload, is_link) {
                Ok(Some(id)) => progress.debug(&format!("Created organizer {}", id)),
                Ok(None) => progress.warn("Unable to create an organizer from a payload without ID"),
                Err(err) => progress.warn(&format!("Unable to create organizer {:?}: {}", payload.id, err)),
            }
        }
    }

    if let Some(modified) = &block.modified {
        for payload in modified.folder.iter().chain(modified.link.iter()) {
            let id = match &payload.id {
                None => {
                    progress.warn("Unable to apply a modification without organizer ID");
                    continue;
                },
                Some(id) => id,
            };
            if tree.contains(id) == false {
                progress.debug(&format!("Skipping modification of {}, it is not in this tree", id));
                continue;
            }
            if let Err(err) = tree.notify_modify(id, payload) {
                progress.warn(&format!("Unable to modify organizer {}: {}", id, err));
            }
        }
    }

    if let Some(deleted) = &block.deleted {
        for id in deleted.ids() {
            if tree.contains(&id) == false {
                continue;
            }
            if let Err(err) = tree.notify_delete(&id) {
                progress.warn(&format!("Unable to delete organizer {}: {}", id, err));
            }
        }
    }

    progress.is_success()
}
