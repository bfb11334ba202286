//! Monthly spending insights
//!
//! Builds the aggregated summary of a month: totals, per-category breakdown,
//! the previous month's total and budget status. The payload carries only
//! numbers and category names, never transaction descriptions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SpendResult;
use crate::models::{Money, MonthPeriod};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget versus actual spend for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetSpend {
    pub budget: f64,
    pub spent: f64,
}

/// Aggregated spending summary for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightPayload {
    /// "YYYY-MM"
    pub month: String,
    pub total_spending: f64,
    pub currency: String,
    pub category_breakdown: BTreeMap<String, f64>,
    pub previous_month_total: f64,
    /// Present only when the month has budgets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_status: Option<BTreeMap<String, BudgetSpend>>,
}

/// Service producing insight payloads
pub struct InsightService<'a> {
    storage: &'a Storage,
}

impl<'a> InsightService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Aggregate stored transactions and budgets for `period`
    ///
    /// Amounts are summed as stored regardless of their currency; `base_currency`
    /// is only the label reported with the totals.
    pub fn aggregate(&self, period: MonthPeriod, base_currency: &str) -> SpendResult<InsightPayload> {
        let current = self
            .storage
            .transactions
            .get_by_date_range(period.start_date(), period.end_date())?;

        let mut breakdown: BTreeMap<String, Money> = BTreeMap::new();
        for txn in &current {
            *breakdown.entry(txn.category_name().to_string()).or_default() += txn.amount;
        }
        let total: Money = current.iter().map(|t| t.amount).sum();

        let previous = period.previous();
        let previous_total: Money = self
            .storage
            .transactions
            .get_by_date_range(previous.start_date(), previous.end_date())?
            .iter()
            .map(|t| t.amount)
            .sum();

        let status: BTreeMap<String, BudgetSpend> = BudgetService::new(self.storage)
            .status_for_month(period)?
            .into_iter()
            .map(|s| {
                (
                    s.budget.category.clone(),
                    BudgetSpend {
                        budget: s.budget.amount.as_f64(),
                        spent: s.spent.as_f64(),
                    },
                )
            })
            .collect();

        debug!(
            month = %period,
            transactions = current.len(),
            categories = breakdown.len(),
            budgets = status.len(),
            "aggregated insights"
        );

        Ok(InsightPayload {
            month: period.to_string(),
            total_spending: total.as_f64(),
            currency: base_currency.to_string(),
            category_breakdown: breakdown
                .into_iter()
                .map(|(category, amount)| (category, amount.as_f64()))
                .collect(),
            previous_month_total: previous_total.as_f64(),
            budget_status: if status.is_empty() { None } else { Some(status) },
        })
    }
}
