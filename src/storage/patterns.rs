//! Recurring pattern repository for JSON storage
//!
//! Patterns are only ever written when the user confirms a transaction as
//! recurring.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{SpendError, SpendResult};
use crate::models::{RecurringPattern, RecurringPatternId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PatternData {
    #[serde(default)]
    patterns: Vec<RecurringPattern>,
}

/// Repository for confirmed recurring patterns
pub struct PatternRepository {
    path: PathBuf,
    patterns: RwLock<HashMap<RecurringPatternId, RecurringPattern>>,
}

fn lock_error(e: impl std::fmt::Display) -> SpendError {
    SpendError::Storage(format!("Failed to acquire pattern lock: {}", e))
}

impl PatternRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            patterns: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> SpendResult<()> {
        let file_data: PatternData = read_json(&self.path)?;

        let mut patterns = self.patterns.write().map_err(lock_error)?;
        patterns.clear();
        for pattern in file_data.patterns {
            patterns.insert(pattern.id, pattern);
        }
        Ok(())
    }

    pub fn save(&self) -> SpendResult<()> {
        let list = self.get_all()?;
        write_json_atomic(&self.path, &PatternData { patterns: list })
    }

    pub fn get(&self, id: RecurringPatternId) -> SpendResult<Option<RecurringPattern>> {
        let patterns = self.patterns.read().map_err(lock_error)?;
        Ok(patterns.get(&id).cloned())
    }

    /// All patterns in creation order
    pub fn get_all(&self) -> SpendResult<Vec<RecurringPattern>> {
        let patterns = self.patterns.read().map_err(lock_error)?;
        let mut list: Vec<_> = patterns.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(list)
    }

    pub fn upsert(&self, pattern: RecurringPattern) -> SpendResult<()> {
        let mut patterns = self.patterns.write().map_err(lock_error)?;
        patterns.insert(pattern.id, pattern);
        Ok(())
    }

    pub fn delete(&self, id: RecurringPatternId) -> SpendResult<bool> {
        let mut patterns = self.patterns.write().map_err(lock_error)?;
        Ok(patterns.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, RecurringInterval};
    use tempfile::TempDir;

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recurring_patterns.json");
        let repo = PatternRepository::new(path.clone());

        let pattern =
            RecurringPattern::new("netflix", Money::from_cents(4500), RecurringInterval::Monthly);
        let id = pattern.id;
        repo.upsert(pattern).unwrap();
        repo.save().unwrap();

        let repo2 = PatternRepository::new(path);
        repo2.load().unwrap();
        let loaded = repo2.get(id).unwrap().unwrap();
        assert_eq!(loaded.normalized_description.as_deref(), Some("netflix"));
        assert_eq!(loaded.interval, RecurringInterval::Monthly);

        assert!(repo2.delete(id).unwrap());
        assert!(repo2.get_all().unwrap().is_empty());
    }
}
