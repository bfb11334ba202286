//! Recurring expense CLI commands

use clap::Subcommand;

use super::{parse_optional_date, print_json};
use crate::display::{format_recurring_groups, format_suggestion_register};
use crate::error::SpendResult;
use crate::services::{RecurringService, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Recurring subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// List transactions with recurring suggestions
    List {
        /// Only show transactions suggested as recurring
        #[arg(long)]
        only_suggested: bool,
        /// Filter by category name
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show detected recurring groups
    Groups {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Confirm a transaction as a recurring expense
    Confirm {
        /// Transaction ID or ID prefix
        id: String,
    },
}

/// Handle a recurring command
pub fn handle_recurring_command(storage: &Storage, cmd: RecurringCommands) -> SpendResult<()> {
    let service = RecurringService::new(storage);

    match cmd {
        RecurringCommands::List {
            only_suggested,
            category,
            from,
            to,
            json,
        } => {
            let filter = TransactionFilter {
                start_date: parse_optional_date(from.as_deref())?,
                end_date: parse_optional_date(to.as_deref())?,
                category,
                ..Default::default()
            };
            let mut rows = service.list_with_suggestions(&filter)?;
            if only_suggested {
                rows.retain(|r| r.recurring_suggestion);
            }

            if json {
                return print_json(&rows);
            }
            print!("{}", format_suggestion_register(&rows));
        }

        RecurringCommands::Groups { json } => {
            let groups = service.groups()?;
            if json {
                return print_json(&groups);
            }
            print!("{}", format_recurring_groups(&groups));
        }

        RecurringCommands::Confirm { id } => {
            let txn = TransactionService::new(storage).require(&id)?;
            let (txn, pattern) = service.confirm(txn.id)?;
            println!(
                "Confirmed {} as a {} recurring expense ({})",
                txn.id, pattern.interval, pattern.id
            );
        }
    }

    Ok(())
}
