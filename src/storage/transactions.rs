//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::{SpendError, SpendResult};
use crate::models::{Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: import_id -> transaction_id
    by_import_id: RwLock<HashMap<String, TransactionId>>,
}

fn lock_error(e: impl std::fmt::Display) -> SpendError {
    SpendError::Storage(format!("Failed to acquire transaction lock: {}", e))
}

/// Newest first; ties broken by creation time
fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_import_id: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the import index
    pub fn load(&self) -> SpendResult<()> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_import_id = self.by_import_id.write().map_err(lock_error)?;

        data.clear();
        by_import_id.clear();

        for txn in file_data.transactions {
            if let Some(import_id) = &txn.import_id {
                by_import_id.insert(import_id.clone(), txn.id);
            }
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> SpendResult<()> {
        let data = self.data.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> SpendResult<Option<Transaction>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> SpendResult<Vec<Transaction>> {
        let data = self.data.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Get transactions dated within `start..=end`, newest first
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SpendResult<Vec<Transaction>> {
        let all = self.get_all()?;
        Ok(all
            .into_iter()
            .filter(|t| t.date >= start && t.date <= end)
            .collect())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> SpendResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_import_id = self.by_import_id.write().map_err(lock_error)?;

        if let Some(old_import) = data.get(&txn.id).and_then(|old| old.import_id.clone()) {
            by_import_id.remove(&old_import);
        }
        if let Some(import_id) = &txn.import_id {
            by_import_id.insert(import_id.clone(), txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning whether it existed
    pub fn delete(&self, id: TransactionId) -> SpendResult<bool> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_import_id = self.by_import_id.write().map_err(lock_error)?;

        match data.remove(&id) {
            Some(txn) => {
                if let Some(import_id) = txn.import_id {
                    by_import_id.remove(&import_id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Find a transaction by its import ID
    pub fn find_by_import_id(&self, import_id: &str) -> SpendResult<Option<Transaction>> {
        let data = self.data.read().map_err(lock_error)?;
        let by_import_id = self.by_import_id.read().map_err(lock_error)?;

        Ok(by_import_id
            .get(import_id)
            .and_then(|id| data.get(id))
            .cloned())
    }

    /// Count transactions
    pub fn count(&self) -> SpendResult<usize> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
