//! Tag repository for JSON storage
//!
//! Manages loading and saving tags to tags.json. Links between tags and
//! transactions live on the transactions themselves.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{SpendError, SpendResult};
use crate::models::{Tag, TagId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TagData {
    #[serde(default)]
    tags: Vec<Tag>,
}

/// Repository for tag persistence
pub struct TagRepository {
    path: PathBuf,
    tags: RwLock<HashMap<TagId, Tag>>,
}

fn lock_error(e: impl std::fmt::Display) -> SpendError {
    SpendError::Storage(format!("Failed to acquire tag lock: {}", e))
}

impl TagRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            tags: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> SpendResult<()> {
        let file_data: TagData = read_json(&self.path)?;

        let mut tags = self.tags.write().map_err(lock_error)?;
        tags.clear();
        for tag in file_data.tags {
            tags.insert(tag.id, tag);
        }
        Ok(())
    }

    pub fn save(&self) -> SpendResult<()> {
        let list = self.get_all()?;
        write_json_atomic(&self.path, &TagData { tags: list })
    }

    pub fn get(&self, id: TagId) -> SpendResult<Option<Tag>> {
        let tags = self.tags.read().map_err(lock_error)?;
        Ok(tags.get(&id).cloned())
    }

    /// All tags, sorted by name
    pub fn get_all(&self) -> SpendResult<Vec<Tag>> {
        let tags = self.tags.read().map_err(lock_error)?;
        let mut list: Vec<_> = tags.values().cloned().collect();
        list.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(list)
    }

    /// Find a tag by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> SpendResult<Option<Tag>> {
        let name = name.trim().to_lowercase();
        let tags = self.tags.read().map_err(lock_error)?;
        Ok(tags
            .values()
            .find(|t| t.name.to_lowercase() == name)
            .cloned())
    }

    pub fn upsert(&self, tag: Tag) -> SpendResult<()> {
        let mut tags = self.tags.write().map_err(lock_error)?;
        tags.insert(tag.id, tag);
        Ok(())
    }

    pub fn delete(&self, id: TagId) -> SpendResult<bool> {
        let mut tags = self.tags.write().map_err(lock_error)?;
        Ok(tags.remove(&id).is_some())
    }

    pub fn count(&self) -> SpendResult<usize> {
        let tags = self.tags.read().map_err(lock_error)?;
        Ok(tags.len())
    }
}
