//! Budget CLI commands
//!
//! Implements CLI commands for monthly category budgets.

use chrono::Datelike;
use clap::Subcommand;

use super::{parse_amount, print_json};
use crate::display::{format_budget_list, format_budget_status};
use crate::error::{SpendError, SpendResult};
use crate::models::MonthPeriod;
use crate::services::{BudgetService, CreateBudgetInput, UpdateBudgetInput};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set a budget for a category
    Add {
        /// Category name
        category: String,
        /// Amount (e.g., "500" or "500.00")
        amount: String,
        /// Month (1-12), defaults to the current month
        #[arg(short, long)]
        month: Option<u32>,
        /// Year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List budgets
    List {
        /// Only this month (1-12)
        #[arg(short, long)]
        month: Option<u32>,
        /// Only this year
        #[arg(short, long)]
        year: Option<i32>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a budget
    Update {
        /// Budget ID or ID prefix
        id: String,
        /// New category name
        #[arg(short, long)]
        category: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New month (1-12)
        #[arg(short, long)]
        month: Option<u32>,
        /// New year
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Delete a budget
    Delete {
        /// Budget ID or ID prefix
        id: String,
    },

    /// Show spending against each budget for a month
    Status {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        period: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> SpendResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Add {
            category,
            amount,
            month,
            year,
        } => {
            let today = chrono::Local::now().date_naive();
            let budget = service.create(CreateBudgetInput {
                category,
                month: month.unwrap_or(today.month()),
                year: year.unwrap_or(today.year()),
                amount: parse_amount(&amount)?,
            })?;
            println!(
                "Budget {} set: {} {} for {}",
                budget.id,
                budget.category,
                budget.amount,
                budget.period()
            );
        }

        BudgetCommands::List { month, year, json } => {
            let budgets = service.list(month, year)?;
            if json {
                return print_json(&budgets);
            }
            print!("{}", format_budget_list(&budgets));
        }

        BudgetCommands::Update {
            id,
            category,
            amount,
            month,
            year,
        } => {
            let budget = find_budget(&service, &id)?;
            let input = UpdateBudgetInput {
                category,
                month,
                year,
                amount: amount.as_deref().map(parse_amount).transpose()?,
            };
            let updated = service.update(budget.id, input)?;
            println!(
                "Budget {} updated: {} {} for {}",
                updated.id,
                updated.category,
                updated.amount,
                updated.period()
            );
        }

        BudgetCommands::Delete { id } => {
            let budget = find_budget(&service, &id)?;
            service.delete(budget.id)?;
            println!("Deleted budget {}", budget.id);
        }

        BudgetCommands::Status { period, json } => {
            let period = match period {
                Some(p) => p.parse::<MonthPeriod>()?,
                None => MonthPeriod::current(),
            };
            let statuses = service.status_for_month(period)?;
            if json {
                return print_json(&statuses);
            }
            println!("Budgets for {}", period);
            print!("{}", format_budget_status(&statuses));
        }
    }

    Ok(())
}

fn find_budget(service: &BudgetService, id: &str) -> SpendResult<crate::models::Budget> {
    service
        .find(id)?
        .ok_or_else(|| SpendError::budget_not_found(id))
}
