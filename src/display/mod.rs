//! Display formatting for terminal output
//!
//! Plain-text registers and reports; JSON output goes through serde instead.

pub mod report;
pub mod transaction;

pub use report::{format_budget_list, format_budget_status, format_insights, format_recurring_groups};
pub use transaction::{
    format_candidates, format_import_preview, format_suggestion_register, format_tag_list,
    format_transaction_details, format_transaction_register,
};
