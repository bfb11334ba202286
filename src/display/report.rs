//! Report formatting for budgets, insights and recurring groups

use crate::detection::RecurringGroup;
use crate::models::Budget;
use crate::services::{BudgetStatus, InsightPayload};

use super::transaction::truncate;

const BAR_WIDTH: usize = 20;

/// Create a simple bar chart representation, capped at `width`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// List budgets, one per line
pub fn format_budget_list(budgets: &[Budget]) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let mut output = format!("{:12} {:7} {:20} {:>12}\n", "ID", "Month", "Category", "Amount");
    output.push_str(&separator(54));
    output.push('\n');
    for budget in budgets {
        output.push_str(&format!(
            "{:12} {:7} {} {:>12}\n",
            budget.id.to_string(),
            budget.period().to_string(),
            truncate(&budget.category, 20),
            budget.amount,
        ));
    }
    output
}

/// Spent-vs-budget table with usage bars
pub fn format_budget_status(statuses: &[BudgetStatus]) -> String {
    if statuses.is_empty() {
        return "No budgets for this month.\n".to_string();
    }

    let mut output = String::new();
    for status in statuses {
        let budget = status.budget.amount.as_f64();
        let spent = status.spent.as_f64();
        let usage = if budget > 0.0 { spent / budget * 100.0 } else { 0.0 };
        let flag = if status.is_over() { "  OVER" } else { "" };

        output.push_str(&format!(
            "{} {} {:>10} / {:>10} {:>5}{}\n",
            truncate(&status.budget.category, 16),
            format_bar(spent, budget, BAR_WIDTH),
            status.spent,
            status.budget.amount,
            format_percentage(usage),
            flag,
        ));
    }
    output
}

/// Monthly insight summary
pub fn format_insights(payload: &InsightPayload) -> String {
    let mut output = String::new();

    output.push_str(&format!("Spending for {}\n", payload.month));
    output.push_str(&separator(48));
    output.push('\n');
    output.push_str(&format!(
        "Total:          {} {:.2}\n",
        payload.currency, payload.total_spending
    ));
    output.push_str(&format!(
        "Previous month: {} {:.2}\n",
        payload.currency, payload.previous_month_total
    ));

    if payload.previous_month_total > 0.0 {
        let change = (payload.total_spending - payload.previous_month_total)
            / payload.previous_month_total
            * 100.0;
        output.push_str(&format!("Change:         {:+.1}%\n", change));
    }

    if !payload.category_breakdown.is_empty() {
        output.push_str("\nBy category:\n");

        let mut categories: Vec<_> = payload.category_breakdown.iter().collect();
        categories.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (category, amount) in categories {
            output.push_str(&format!(
                "  {} {} {:>10.2}\n",
                truncate(category, 16),
                format_bar(*amount, payload.total_spending, BAR_WIDTH),
                amount
            ));
        }
    }

    if let Some(status) = &payload.budget_status {
        output.push_str("\nBudgets:\n");
        for (category, spend) in status {
            let flag = if spend.spent > spend.budget { "  OVER" } else { "" };
            output.push_str(&format!(
                "  {} {:>10.2} / {:>10.2}{}\n",
                truncate(category, 16),
                spend.spent,
                spend.budget,
                flag
            ));
        }
    }

    output
}

/// Detected recurring groups
pub fn format_recurring_groups(groups: &[RecurringGroup]) -> String {
    if groups.is_empty() {
        return "No recurring expenses detected.\n".to_string();
    }

    let mut output = format!(
        "{:24} {:8} {:>12} {:>5}  {}\n",
        "Description", "Interval", "Median", "Count", "Last seen"
    );
    output.push_str(&separator(64));
    output.push('\n');
    for group in groups {
        output.push_str(&format!(
            "{} {:8} {:>12} {:>5}  {}\n",
            truncate(&group.key, 24),
            group.interval.to_string(),
            group.median_amount,
            group.transaction_ids.len(),
            group.last_date.format("%Y-%m-%d"),
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::services::BudgetSpend;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_bar() {
        let bar = format_bar(50.0, 100.0, 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);

        let over = format_bar(300.0, 100.0, 10);
        assert_eq!(over.chars().filter(|c| *c == '█').count(), 10);
    }

    #[test]
    fn test_budget_status_flags_overspend() {
        let statuses = vec![BudgetStatus {
            budget: Budget::new("Food", 3, 2024, Money::from_cents(10000)),
            spent: Money::from_cents(12000),
        }];
        let output = format_budget_status(&statuses);
        assert!(output.contains("OVER"));
        assert!(output.contains("120%"));
    }

    #[test]
    fn test_format_insights() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert("Food".to_string(), 60.0);
        breakdown.insert("Other".to_string(), 20.0);
        let mut status = BTreeMap::new();
        status.insert("Food".to_string(), BudgetSpend { budget: 50.0, spent: 60.0 });

        let payload = InsightPayload {
            month: "2024-03".into(),
            total_spending: 80.0,
            currency: "MYR".into(),
            category_breakdown: breakdown,
            previous_month_total: 40.0,
            budget_status: Some(status),
        };

        let output = format_insights(&payload);
        assert!(output.contains("Total:          MYR 80.00"));
        assert!(output.contains("+100.0%"));
        assert!(output.find("Food").unwrap() < output.find("Other").unwrap());
        assert!(output.contains("OVER"));
    }
}
