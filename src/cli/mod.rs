//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod detect;
pub mod export;
pub mod import;
pub mod insights;
pub mod recurring;
pub mod tag;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use detect::{handle_detect_command, DetectArgs};
pub use export::{handle_export_command, ExportArgs};
pub use import::{handle_import_command, ImportArgs};
pub use insights::{handle_insights_command, InsightsArgs};
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use tag::{handle_tag_command, TagCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{SpendError, SpendResult};
use crate::models::Money;

/// Parse a YYYY-MM-DD argument
pub(crate) fn parse_date(value: &str) -> SpendResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        SpendError::Validation(format!("Invalid date '{}'; use YYYY-MM-DD", value))
    })
}

pub(crate) fn parse_optional_date(value: Option<&str>) -> SpendResult<Option<NaiveDate>> {
    value.map(parse_date).transpose()
}

/// Parse an amount argument such as "45", "45.50" or "1,200.00"
pub(crate) fn parse_amount(value: &str) -> SpendResult<Money> {
    Money::parse(value)
        .map_err(|e| SpendError::Validation(format!("Invalid amount '{}': {}", value, e)))
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> SpendResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
