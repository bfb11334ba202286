//! Transaction model
//!
//! A persisted expense row. Rows are created when the user confirms a detected
//! candidate during import; recurring flags are only set by an explicit
//! confirmation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::CandidateTransaction;
use super::ids::{RecurringPatternId, TagId, TransactionId};
use super::money::Money;

/// Category name reported for transactions without a confirmed category
pub const UNCATEGORIZED: &str = "Other";

/// A persisted expense transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Transaction date
    pub date: NaiveDate,

    /// Amount spent (non-negative for detected spend)
    pub amount: Money,

    /// Currency code, e.g. "MYR"
    pub currency: String,

    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Confirmed category name
    #[serde(default)]
    pub category: Option<String>,

    /// Name of the document this row was detected in
    #[serde(default)]
    pub source_file: Option<String>,

    /// Import ID for duplicate detection
    #[serde(default)]
    pub import_id: Option<String>,

    /// Set once the user confirms this as a recurring expense
    #[serde(default)]
    pub is_recurring: bool,

    /// The confirmed pattern this transaction belongs to
    #[serde(default)]
    pub recurring_pattern_id: Option<RecurringPatternId>,

    /// Attached tags, in the order they were added
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(date: NaiveDate, amount: Money, currency: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            date,
            amount,
            currency: currency.into(),
            description: None,
            category: None,
            source_file: None,
            import_id: None,
            is_recurring: false,
            recurring_pattern_id: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a transaction from a reviewed candidate
    pub fn from_candidate(candidate: &CandidateTransaction) -> Self {
        let mut txn = Self::new(candidate.date, candidate.amount, candidate.currency.clone());
        txn.description = Some(candidate.description.clone());
        txn
    }

    /// Category name for reporting, "Other" when unset
    pub fn category_name(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Description for display, empty when unset
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Set the confirmed category (blank clears it)
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self.updated_at = Utc::now();
    }

    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }

    /// Attach a tag; returns false when it was already attached
    pub fn add_tag(&mut self, tag: TagId) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag);
        self.updated_at = Utc::now();
        true
    }

    /// Detach a tag; returns false when it was not attached
    pub fn remove_tag(&mut self, tag: TagId) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| *t != tag);
        if self.tags.len() == before {
            return false;
        }
        self.updated_at = Utc::now();
        true
    }

    /// Mark as a confirmed recurring expense
    pub fn mark_recurring(&mut self, pattern_id: RecurringPatternId) {
        self.is_recurring = true;
        self.recurring_pattern_id = Some(pattern_id);
        self.updated_at = Utc::now();
    }
}
