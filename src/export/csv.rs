//! CSV export of stored transactions

use std::io::Write;

use chrono::NaiveDate;
use tracing::info;

use crate::error::SpendResult;
use crate::services::{TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Column header of the transaction export
pub const CSV_HEADER: [&str; 6] = [
    "Date",
    "Description",
    "Category",
    "Amount",
    "Currency",
    "Source file",
];

/// Currency written for rows stored without one
const FALLBACK_CURRENCY: &str = "MYR";

/// Which transactions to export
#[derive(Debug, Clone, Default)]
pub struct ExportFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<String>,
}

impl From<&ExportFilter> for TransactionFilter {
    fn from(filter: &ExportFilter) -> Self {
        TransactionFilter {
            start_date: filter.from,
            end_date: filter.to,
            category: filter.category.clone(),
            ..Default::default()
        }
    }
}

/// Write matching transactions as CSV, newest first; returns the row count
pub fn export_transactions_csv<W: Write>(
    storage: &Storage,
    writer: W,
    filter: &ExportFilter,
) -> SpendResult<usize> {
    let transactions = TransactionService::new(storage).list(filter.into())?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for txn in &transactions {
        let currency = if txn.currency.trim().is_empty() {
            FALLBACK_CURRENCY
        } else {
            txn.currency.as_str()
        };

        csv_writer.write_record([
            txn.date.to_string().as_str(),
            txn.description_text(),
            txn.category_name(),
            txn.amount.to_string().as_str(),
            currency,
            txn.source_file.as_deref().unwrap_or(""),
        ])?;
    }

    csv_writer.flush()?;

    info!(rows = transactions.len(), "exported transactions to CSV");
    Ok(transactions.len())
}

/// Default download name, e.g. `transactions-2024-03-12.csv`
pub fn default_export_filename(today: NaiveDate) -> String {
    format!("transactions-{}.csv", today.format("%Y-%m-%d"))
}
