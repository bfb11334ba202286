//! Core data models for SpendScan
//!
//! This module contains the value types that flow through detection, review,
//! and reporting: money, ids, candidates, persisted transactions, budgets, tags,
//! and confirmed recurring patterns.

pub mod budget;
pub mod candidate;
pub mod ids;
pub mod money;
pub mod period;
pub mod recurring;
pub mod tag;
pub mod transaction;

pub use budget::{Budget, BudgetValidationError};
pub use candidate::{CandidateTransaction, PLACEHOLDER_DESCRIPTION};
pub use ids::{BudgetId, RecurringPatternId, TagId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use period::MonthPeriod;
pub use recurring::{RecurringInterval, RecurringPattern};
pub use tag::{Tag, TagValidationError, MAX_TAG_NAME_CHARS};
pub use transaction::{Transaction, UNCATEGORIZED};
