//! This module provides a local cache for organizer trees
//!
//! Because the connection to the server may be slow, an app may want to quickly display the organizers it knew about on startup.

use std::path::PathBuf;
use std::path::Path;
use std::error::Error;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::organizer::ViewType;
use crate::payload::FolderPayload;
use crate::traits::SyncSlave;
use crate::tree::OrganizerTree;

const CACHE_FOLDER: &str = "organizer-cache";


/// A snapshot of an organizer tree, stored in a local file
#[derive(Debug, PartialEq)]
pub struct Cache {
    backing_file: PathBuf,
    data: CachedData,
}

#[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
struct CachedData {
    view: Option<ViewType>,
    tree: Option<FolderPayload>,
    last_sync: Option<DateTime<Utc>>,
}

impl Cache {
    /// Get the path to the cache file of an account
    pub fn default_path(account: &str, view: ViewType) -> PathBuf {
        let file_name = sanitize_filename::sanitize(format!("{}-{}.json", account, view.as_tag()));
        PathBuf::from(CACHE_FOLDER).join(file_name)
    }

    /// Initialize a cache from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self{
            backing_file: PathBuf::from(path),
            data,
        })
    }

    /// Initialize an empty cache
    pub fn new(path: &Path) -> Self {
        Self{
            backing_file: PathBuf::from(path),
            data: CachedData::default(),
        }
    }

    /// Store the current Cache to its backing file
    pub fn save_to_file(&self) -> Result<(), Box<dyn Error>> {
        let path = &self.backing_file;
        if let Some(folder) = path.parent() {
            std::fs::create_dir_all(folder)?;
        }
        let file = std::fs::File::create(path)
            .map_err(|err| format!("Unable to save file {:?}: {}", path, err))?;
        serde_json::to_writer(file, &self.data)?;
        Ok(())
    }

    /// Take a snapshot of `tree`. It is not written to disk until [`Self::save_to_file`] is called
    pub fn store_tree(&mut self, tree: &OrganizerTree) {
        self.data.view = Some(tree.view());
        self.data.tree = Some(tree.to_payload());
    }

    /// Rebuild the tree that was stored, if any
    pub fn load_tree(&self) -> Option<OrganizerTree> {
        let (view, payload) = match (self.data.view, &self.data.tree) {
            (Some(view), Some(payload)) => (view, payload),
            _ => return None,
        };
        match OrganizerTree::from_payload(view, payload) {
            Ok(tree) => Some(tree),
            Err(err) => {
                log::warn!("Invalid cached tree in {:?}: {}", self.backing_file, err);
                None
            },
        }
    }
}

impl SyncSlave for Cache {
    fn get_last_sync(&self) -> Option<DateTime<Utc>> {
        self.data.last_sync
    }

    fn update_last_sync(&mut self, timepoint: Option<DateTime<Utc>>) {
        self.data.last_sync = Some(timepoint.unwrap_or_else(Utc::now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::organizer::OrganizerId;
    use crate::organizer::color::Color;
    use crate::organizer::share::Permissions;

    #[test]
    fn serde_cache() {
        let folder = tempfile::tempdir().unwrap();
        let cache_path = folder.path().join("cache.json");

        let mut tree = OrganizerTree::new(ViewType::Calendar);
        let work = FolderPayload {
            name: Some("Work".to_string()),
            color: Some(Color::Blue),
            view: Some("appointment".to_string()),
            exclude_free_busy: Some(true),
            ..FolderPayload::with_id("300")
        };
        let shared = FolderPayload {
            name: Some("Bob's".to_string()),
            view: Some("appointment".to_string()),
            owner: Some("bob@example.com".to_string()),
            ..FolderPayload::with_id("301")
        };
        tree.create_from_payload(&OrganizerId::root(), &work, false).unwrap();
        tree.create_from_payload(&OrganizerId::root(), &shared, true).unwrap();
        tree.get_mut(&OrganizerId::from("301")).unwrap().set_permission(Permissions::READ);

        let mut cache = Cache::new(&cache_path);
        assert!(cache.load_tree().is_none());
        cache.store_tree(&tree);
        cache.update_last_sync(None);
        cache.save_to_file().unwrap();

        let retrieved_cache = Cache::from_file(&cache_path).unwrap();
        assert_eq!(cache, retrieved_cache);
        assert!(retrieved_cache.get_last_sync().is_some());

        let retrieved_tree = retrieved_cache.load_tree().unwrap();
        assert_eq!(retrieved_tree.len(), 2);
        assert_eq!(retrieved_tree.to_payload(), tree.to_payload());
        let bob = retrieved_tree.get(&OrganizerId::from("301")).unwrap();
        assert!(bob.is_link());
        assert_eq!(bob.shares()[0].permissions(), Permissions::READ);
        assert!(retrieved_tree.get(&OrganizerId::from("300")).unwrap().exclude_free_busy());
    }

    #[test]
    fn test_default_path() {
        let path = Cache::default_path("alice/../bob@example.com", ViewType::Task);
        assert!(path.starts_with(CACHE_FOLDER));
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.contains('/') == false);
        assert!(file_name.ends_with("-task.json"));
    }

    #[test]
    fn missing_file() {
        assert!(Cache::from_file(Path::new("/this/does/not/exist.json")).is_err());
    }
}
