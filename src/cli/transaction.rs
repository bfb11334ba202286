//! Transaction CLI commands
//!
//! Implements CLI commands for reviewing stored transactions.

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_optional_date, print_json};
use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::SpendResult;
use crate::services::{
    CreateTransactionInput, TagService, TransactionFilter, TransactionService,
    UpdateTransactionInput,
};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a transaction by hand
    Add {
        /// Amount (e.g., "45.00")
        amount: String,
        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// Category name
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Currency code, defaults to the configured currency
        #[arg(long)]
        currency: Option<String>,
    },
    /// List transactions
    List {
        /// Filter by category name ("Other" matches uncategorized)
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only transactions carrying this tag (name or ID)
        #[arg(short, long)]
        tag: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show transaction details
    Show {
        /// Transaction ID or ID prefix
        id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Confirm the category of a transaction (omit the category to clear it)
    Categorize {
        /// Transaction ID or ID prefix
        id: String,
        /// Category name
        category: Option<String>,
    },
    /// Correct the date, amount, currency, description or category
    Edit {
        /// Transaction ID or ID prefix
        id: String,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New currency code
        #[arg(long)]
        currency: Option<String>,
        /// New description (empty clears it)
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// New category (empty clears it)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Replace the tags of a transaction (no tags clears them)
    Tag {
        /// Transaction ID or ID prefix
        id: String,
        /// Tag names or IDs
        tags: Vec<String>,
    },
    /// Remove one tag from a transaction
    Untag {
        /// Transaction ID or ID prefix
        id: String,
        /// Tag name or ID
        tag: String,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID or ID prefix
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> SpendResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            description,
            category,
            date,
            currency,
        } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => chrono::Local::now().date_naive(),
            };
            let currency = currency.unwrap_or_else(|| settings.default_currency.clone());

            let mut input = CreateTransactionInput::new(date, parse_amount(&amount)?, currency);
            input.description = description;
            input.category = category;

            let txn = service.create(input)?;
            println!("Added transaction {}", txn.id);
        }

        TransactionCommands::List {
            category,
            limit,
            from,
            to,
            tag,
            json,
        } => {
            let tag = match tag {
                Some(name) => Some(TagService::new(storage).require(&name)?.id),
                None => None,
            };
            let filter = TransactionFilter {
                start_date: parse_optional_date(from.as_deref())?,
                end_date: parse_optional_date(to.as_deref())?,
                category,
                tag,
                limit: Some(limit),
                ..Default::default()
            };
            let transactions = service.list(filter)?;

            if json {
                return print_json(&transactions);
            }
            print!("{}", format_transaction_register(&transactions));
        }

        TransactionCommands::Show { id, json } => {
            let txn = service.require(&id)?;
            if json {
                return print_json(&txn);
            }
            let tags = TagService::new(storage).tags_for_transaction(&txn)?;
            print!("{}", format_transaction_details(&txn, &tags));
        }

        TransactionCommands::Categorize { id, category } => {
            let txn = service.require(&id)?;
            let updated = service.update_category(txn.id, category)?;
            println!("{} is now in '{}'", updated.id, updated.category_name());
        }

        TransactionCommands::Edit {
            id,
            date,
            amount,
            currency,
            description,
            category,
        } => {
            let txn = service.require(&id)?;
            let input = UpdateTransactionInput {
                date: parse_optional_date(date.as_deref())?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                currency,
                description,
                category,
            };
            let updated = service.update(txn.id, input)?;
            println!("Updated transaction {}", updated.id);
        }

        TransactionCommands::Tag { id, tags } => {
            let txn = service.require(&id)?;
            let tag_service = TagService::new(storage);
            let tag_ids = tag_service.resolve(&tags)?;
            let updated = tag_service.set_transaction_tags(txn.id, &tag_ids)?;
            if updated.tags.is_empty() {
                println!("Cleared tags on {}", updated.id);
            } else {
                let names: Vec<String> = tag_service
                    .tags_for_transaction(&updated)?
                    .into_iter()
                    .map(|t| t.name)
                    .collect();
                println!("{} tagged: {}", updated.id, names.join(", "));
            }
        }

        TransactionCommands::Untag { id, tag } => {
            let txn = service.require(&id)?;
            let tag_service = TagService::new(storage);
            let tag = tag_service.require(&tag)?;
            tag_service.remove_from_transaction(txn.id, tag.id)?;
            println!("Removed '{}' from {}", tag.name, txn.id);
        }

        TransactionCommands::Delete { id } => {
            let txn = service.require(&id)?;
            service.delete(txn.id)?;
            println!("Deleted transaction {}", txn.id);
        }
    }

    Ok(())
}
