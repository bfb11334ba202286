//! Transaction service
//!
//! Business logic for persisted transactions: creation from reviewed
//! candidates, lookup by full or short ID, filtered listing, corrections to
//! detected fields, category confirmation and deletion.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{SpendError, SpendResult};
use crate::models::{Money, TagId, Transaction, TransactionId, UNCATEGORIZED};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by date range start (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end (inclusive)
    pub end_date: Option<NaiveDate>,
    /// Filter by category name; "Other" also matches uncategorized rows
    pub category: Option<String>,
    /// Only transactions carrying this tag
    pub tag: Option<TagId>,
    /// Only transactions confirmed as recurring
    pub recurring_only: bool,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by date range
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn from(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn to(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Filter by category name
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tag(mut self, tag: TagId) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn recurring_only(mut self) -> Self {
        self.recurring_only = true;
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a transaction passes every criterion except the limit
    pub fn matches(&self, txn: &Transaction) -> bool {
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        if let Some(category) = &self.category {
            if !txn.category_name().eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        if self.tag.is_some_and(|tag| !txn.has_tag(tag)) {
            return false;
        }
        if self.recurring_only && !txn.is_recurring {
            return false;
        }
        true
    }

    /// Apply the filter to an already ordered list
    pub fn apply(&self, mut transactions: Vec<Transaction>) -> Vec<Transaction> {
        transactions.retain(|t| self.matches(t));
        if let Some(limit) = self.limit {
            transactions.truncate(limit);
        }
        transactions
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub date: NaiveDate,
    pub amount: Money,
    pub currency: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub source_file: Option<String>,
    pub import_id: Option<String>,
}

impl CreateTransactionInput {
    pub fn new(date: NaiveDate, amount: Money, currency: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            currency: currency.into(),
            description: None,
            category: None,
            source_file: None,
            import_id: None,
        }
    }
}

/// Corrections to a stored transaction; at least one field must be set
///
/// A blank description or category clears the field.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl UpdateTransactionInput {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.currency.is_none()
            && self.description.is_none()
            && self.category.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create and persist a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> SpendResult<Transaction> {
        let txn = self.build(input)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(id = %txn.id, amount = %txn.amount, "created transaction");
        Ok(txn)
    }

    /// Validate input and build the row without persisting it
    pub(crate) fn build(&self, input: CreateTransactionInput) -> SpendResult<Transaction> {
        if input.amount.is_negative() {
            return Err(SpendError::Validation(
                "Transaction amount cannot be negative".into(),
            ));
        }

        let currency = input.currency.trim().to_uppercase();
        if currency.is_empty() {
            return Err(SpendError::Validation("Currency is required".into()));
        }

        let mut txn = Transaction::new(input.date, input.amount, currency);
        txn.description = non_blank(input.description);
        txn.category = non_blank(input.category);
        txn.source_file = non_blank(input.source_file);
        txn.import_id = input.import_id;
        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> SpendResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full UUID, display ID ("txn-1a2b3c4d") or a hex prefix
    pub fn find(&self, identifier: &str) -> SpendResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }

        let prefix = identifier.trim();
        let prefix = prefix.strip_prefix("txn-").unwrap_or(prefix).to_lowercase();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(None);
        }

        let mut matches: Vec<Transaction> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| t.id.as_uuid().simple().to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(SpendError::Validation(format!(
                "ID prefix '{}' is ambiguous ({} matches)",
                identifier, n
            ))),
        }
    }

    /// Find a transaction or fail with NotFound
    pub fn require(&self, identifier: &str) -> SpendResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| SpendError::transaction_not_found(identifier))
    }

    /// List transactions, newest first
    pub fn list(&self, filter: TransactionFilter) -> SpendResult<Vec<Transaction>> {
        let transactions = match (filter.start_date, filter.end_date) {
            (Some(start), Some(end)) => self.storage.transactions.get_by_date_range(start, end)?,
            _ => self.storage.transactions.get_all()?,
        };
        Ok(filter.apply(transactions))
    }

    /// Correct the fields of a stored transaction
    ///
    /// The import ID is kept, so re-importing the source document still
    /// reports the edited row as a duplicate.
    pub fn update(
        &self,
        id: TransactionId,
        input: UpdateTransactionInput,
    ) -> SpendResult<Transaction> {
        if input.is_empty() {
            return Err(SpendError::Validation("No fields to update".into()));
        }

        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| SpendError::transaction_not_found(id.to_string()))?;

        if let Some(date) = input.date {
            txn.date = date;
        }
        if let Some(amount) = input.amount {
            if amount.is_negative() {
                return Err(SpendError::Validation(
                    "Transaction amount cannot be negative".into(),
                ));
            }
            txn.amount = amount;
        }
        if let Some(currency) = input.currency {
            let currency = currency.trim().to_uppercase();
            if currency.is_empty() {
                return Err(SpendError::Validation("Currency is required".into()));
            }
            txn.currency = currency;
        }
        if let Some(description) = input.description {
            txn.description = non_blank(Some(description));
        }
        if let Some(category) = input.category {
            txn.set_category(Some(category));
        }
        txn.updated_at = chrono::Utc::now();

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(id = %txn.id, "updated transaction");
        Ok(txn)
    }

    /// Confirm (or clear, with None) the category of a transaction
    pub fn update_category(
        &self,
        id: TransactionId,
        category: Option<String>,
    ) -> SpendResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| SpendError::transaction_not_found(id.to_string()))?;

        txn.set_category(category);

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(
            id = %txn.id,
            category = txn.category.as_deref().unwrap_or(UNCATEGORIZED),
            "updated transaction category"
        );
        Ok(txn)
    }

    /// Delete a transaction, returning the removed row
    pub fn delete(&self, id: TransactionId) -> SpendResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| SpendError::transaction_not_found(id.to_string()))?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        info!(id = %id, "deleted transaction");
        Ok(txn)
    }
}
