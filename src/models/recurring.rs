//! Recurring pattern model
//!
//! A pattern is persisted only when the user confirms a transaction as
//! recurring; detection itself never writes one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RecurringPatternId;
use super::money::Money;

/// How often a recurring expense repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurringInterval {
    Weekly,
    #[default]
    Monthly,
}

impl fmt::Display for RecurringInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// A confirmed recurring expense pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringPattern {
    /// Unique identifier
    pub id: RecurringPatternId,

    /// Grouping key of the confirmed transaction; None when it had no description
    pub normalized_description: Option<String>,

    /// Amount the pattern is centered on
    pub amount_center: Money,

    pub interval: RecurringInterval,

    pub created_at: DateTime<Utc>,
}

impl RecurringPattern {
    /// Create a new pattern; an empty key is stored as None
    pub fn new(
        normalized_description: impl Into<String>,
        amount_center: Money,
        interval: RecurringInterval,
    ) -> Self {
        let key = normalized_description.into();
        Self {
            id: RecurringPatternId::new(),
            normalized_description: if key.is_empty() { None } else { Some(key) },
            amount_center,
            interval,
            created_at: Utc::now(),
        }
    }
}
