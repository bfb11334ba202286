//! Service layer for SpendScan
//!
//! The service layer provides business logic on top of the storage layer:
//! import review, categorization, tagging, recurring confirmation, budgets
//! and monthly insights.

pub mod budget;
pub mod import;
pub mod insights;
pub mod recurring;
pub mod tag;
pub mod transaction;

pub use budget::{BudgetService, BudgetStatus, CreateBudgetInput, UpdateBudgetInput};
pub use import::{ImportOptions, ImportPreviewEntry, ImportResult, ImportService, ImportStatus};
pub use insights::{BudgetSpend, InsightPayload, InsightService};
pub use recurring::RecurringService;
pub use tag::TagService;
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
