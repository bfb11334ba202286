//! Export module for SpendScan
//!
//! Spreadsheet-compatible CSV export of stored transactions.

pub mod csv;

pub use self::csv::{default_export_filename, export_transactions_csv, ExportFilter, CSV_HEADER};
