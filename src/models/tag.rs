//! Tag model
//!
//! Free-form labels attached to transactions, e.g. "work trip" or
//! "reimbursable". A transaction keeps the ids of its tags; renaming a tag
//! never touches the transactions that carry it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TagId;

pub const MAX_TAG_NAME_CHARS: usize = 100;

/// A user-defined tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new tag; the name is trimmed and capped
    pub fn new(name: &str) -> Self {
        Self {
            id: TagId::new(),
            name: clean_name(name),
            created_at: Utc::now(),
        }
    }

    /// Change the name, applying the same cleanup as `new`
    pub fn rename(&mut self, name: &str) {
        self.name = clean_name(name);
    }

    pub fn validate(&self) -> Result<(), TagValidationError> {
        if self.name.is_empty() {
            return Err(TagValidationError::EmptyName);
        }
        Ok(())
    }
}

fn clean_name(name: &str) -> String {
    name.trim().chars().take(MAX_TAG_NAME_CHARS).collect()
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    EmptyName,
}

impl fmt::Display for TagValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Tag name is required"),
        }
    }
}

impl std::error::Error for TagValidationError {}
