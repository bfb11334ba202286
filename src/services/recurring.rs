//! Recurring expense service
//!
//! Suggestions are computed on demand and never stored. Only an explicit
//! confirmation writes a pattern and marks the transaction.

use tracing::info;

use crate::detection::{
    attach_recurring_suggestions, find_recurring_groups, normalize_description, RecurringGroup,
    WithRecurringSuggestion,
};
use crate::error::{SpendError, SpendResult};
use crate::models::{RecurringInterval, RecurringPattern, Transaction, TransactionId};
use crate::services::TransactionFilter;
use crate::storage::Storage;

/// Service for recurring suggestions and confirmations
pub struct RecurringService<'a> {
    storage: &'a Storage,
}

impl<'a> RecurringService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Transactions matching `filter`, each flagged with a recurring suggestion
    ///
    /// Detection runs over the full history first so that a narrow filter
    /// never hides a pattern formed by rows outside it.
    pub fn list_with_suggestions(
        &self,
        filter: &TransactionFilter,
    ) -> SpendResult<Vec<WithRecurringSuggestion<Transaction>>> {
        let history = self.storage.transactions.get_all()?;
        let mut flagged = attach_recurring_suggestions(&history);

        flagged.retain(|entry| filter.matches(&entry.item));
        if let Some(limit) = filter.limit {
            flagged.truncate(limit);
        }
        Ok(flagged)
    }

    /// All recurring groups in the stored history
    pub fn groups(&self) -> SpendResult<Vec<RecurringGroup>> {
        let history = self.storage.transactions.get_all()?;
        Ok(find_recurring_groups(&history))
    }

    /// Confirm a transaction as recurring
    ///
    /// The new pattern takes the interval of the detected group containing
    /// the transaction, or monthly when no group contains it.
    pub fn confirm(&self, id: TransactionId) -> SpendResult<(Transaction, RecurringPattern)> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| SpendError::transaction_not_found(id.to_string()))?;

        if txn.is_recurring {
            return Err(SpendError::Validation(format!(
                "Transaction {} is already confirmed as recurring",
                txn.id
            )));
        }

        let interval = self
            .groups()?
            .into_iter()
            .find(|g| g.transaction_ids.contains(&id))
            .map(|g| g.interval)
            .unwrap_or(RecurringInterval::Monthly);

        let pattern = RecurringPattern::new(
            normalize_description(txn.description.as_deref()),
            txn.amount,
            interval,
        );
        txn.mark_recurring(pattern.id);

        self.storage.patterns.upsert(pattern.clone())?;
        self.storage.transactions.upsert(txn.clone())?;
        self.storage.patterns.save()?;
        self.storage.transactions.save()?;

        info!(
            transaction = %txn.id,
            pattern = %pattern.id,
            %interval,
            "confirmed recurring expense"
        );
        Ok((txn, pattern))
    }
}
