//! Detection over raw text and transaction history
//!
//! - `transactions`: turn extracted document text into candidate expenses
//! - `recurring`: flag repeated expenses in persisted history
//!
//! Both are pure. Nothing here reads or writes storage.

pub mod recurring;
pub mod transactions;

pub use recurring::{
    attach_recurring_suggestions, detect_recurring_transaction_ids, find_recurring_groups,
    normalize_description, RecurringGroup, RecurringInput, TransactionForDetection,
    WithRecurringSuggestion,
};
pub use transactions::{detect_transactions, TransactionDetector, DEFAULT_CURRENCY};
