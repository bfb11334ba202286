//! Transaction display formatting
//!
//! Register views for stored transactions, detected candidates and import
//! previews.

use crate::detection::WithRecurringSuggestion;
use crate::models::{CandidateTransaction, Tag, Transaction};
use crate::services::{ImportPreviewEntry, ImportStatus};

/// Format a single stored transaction (register row)
pub fn format_transaction_row(txn: &Transaction) -> String {
    let marker = if txn.is_recurring { "↻" } else { " " };

    format!(
        "{} {:12} {} {:28} {:14} {:>12}",
        marker,
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        truncate(display_description(txn.description_text()), 28),
        truncate(txn.category_name(), 14),
        txn.amount.format_with_currency(&txn.currency),
    )
}

/// Format a list of stored transactions as a register
pub fn format_transaction_register(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = register_header();
    for txn in transactions {
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
    }
    output
}

/// Register with a trailing column flagging likely recurring expenses
pub fn format_suggestion_register(rows: &[WithRecurringSuggestion<Transaction>]) -> String {
    if rows.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = register_header();
    for row in rows {
        output.push_str(&format_transaction_row(&row.item));
        if row.recurring_suggestion && !row.item.is_recurring {
            output.push_str("  likely recurring");
        }
        output.push('\n');
    }
    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, tags: &[Tag]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_currency(&txn.currency)
    ));
    output.push_str(&format!(
        "Description: {}\n",
        display_description(txn.description_text())
    ));
    output.push_str(&format!("Category:    {}\n", txn.category_name()));
    if !tags.is_empty() {
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        output.push_str(&format!("Tags:        {}\n", names.join(", ")));
    }

    if let Some(source) = &txn.source_file {
        output.push_str(&format!("Source file: {}\n", source));
    }
    if let Some(pattern) = txn.recurring_pattern_id {
        output.push_str(&format!("Recurring:   yes ({})\n", pattern));
    }

    output
}

/// List tags with their IDs
pub fn format_tag_list(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "No tags found.\n".to_string();
    }

    let mut output = format!("{:12} {}\n", "ID", "Name");
    output.push_str(&"-".repeat(40));
    output.push('\n');
    for tag in tags {
        output.push_str(&format!("{:12} {}\n", tag.id.to_string(), tag.name));
    }
    output
}

/// Format detector output for review
pub fn format_candidates(candidates: &[CandidateTransaction]) -> String {
    let mut output = format!(
        "{:>3} {:10} {:>14} {}\n",
        "#", "Date", "Amount", "Description"
    );
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for (i, candidate) in candidates.iter().enumerate() {
        output.push_str(&format!(
            "{:>3} {} {:>14} {}\n",
            i + 1,
            candidate.date.format("%Y-%m-%d"),
            candidate.amount.format_with_currency(&candidate.currency),
            candidate.description,
        ));
    }
    output
}

/// Format an import preview, marking duplicates
pub fn format_import_preview(preview: &[ImportPreviewEntry]) -> String {
    let mut output = format!(
        "{:9} {:10} {:>14} {}\n",
        "Status", "Date", "Amount", "Description"
    );
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for entry in preview {
        let status = match entry.status {
            ImportStatus::New if entry.candidate.is_placeholder() => "empty",
            ImportStatus::New => "new",
            ImportStatus::Duplicate => "duplicate",
        };
        output.push_str(&format!(
            "{:9} {} {:>14} {}\n",
            status,
            entry.candidate.date.format("%Y-%m-%d"),
            entry.candidate.amount.format_with_currency(&entry.candidate.currency),
            entry.candidate.description,
        ));
    }
    output
}

fn register_header() -> String {
    let mut output = format!(
        "  {:12} {:10} {:28} {:14} {:>12}\n",
        "ID", "Date", "Description", "Category", "Amount"
    );
    output.push_str(&"-".repeat(84));
    output.push('\n');
    output
}

fn display_description(description: &str) -> &str {
    if description.is_empty() {
        "(no description)"
    } else {
        description
    }
}

/// Pad or cut to `max_len` characters
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
