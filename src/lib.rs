//! SpendScan - expense detection and tracking from the terminal
//!
//! This library turns the text of receipts and bank statements into candidate
//! expense transactions, stores the ones the user confirms, and flags
//! expenses that repeat weekly or monthly.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `detection`: Transaction detector and recurring pattern recognizer (pure)
//! - `extraction`: Text extraction from plain text and PDF documents
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, transactions, budgets, tags, patterns)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `export`: CSV export
//! - `display`, `cli`: Terminal output and command handlers
//!
//! # Example
//!
//! ```rust
//! use spendscan::detection::TransactionDetector;
//!
//! let candidates = TransactionDetector::new().detect("Paid RM 45.00 for lunch on 12/03/2024");
//! assert_eq!(candidates.len(), 1);
//! assert_eq!(candidates[0].amount.cents(), 4500);
//! assert_eq!(candidates[0].description, "Paid for lunch on 12/03/2024");
//! ```

pub mod cli;
pub mod config;
pub mod detection;
pub mod display;
pub mod error;
pub mod export;
pub mod extraction;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{SpendError, SpendResult};
