//! Storage layer for SpendScan
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Each repository owns one file under the data directory.

pub mod budgets;
pub mod file_io;
pub mod patterns;
pub mod tags;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use file_io::{read_json, write_json_atomic};
pub use patterns::PatternRepository;
pub use tags::TagRepository;
pub use transactions::TransactionRepository;

use crate::config::SpendPaths;
use crate::error::SpendResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SpendPaths,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    pub patterns: PatternRepository,
    pub tags: TagRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: SpendPaths) -> SpendResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            patterns: PatternRepository::new(paths.patterns_file()),
            tags: TagRepository::new(paths.tags_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SpendPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> SpendResult<()> {
        self.transactions.load()?;
        self.budgets.load()?;
        self.patterns.load()?;
        self.tags.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> SpendResult<()> {
        self.transactions.save()?;
        self.budgets.save()?;
        self.patterns.save()?;
        self.tags.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (settings file written)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
