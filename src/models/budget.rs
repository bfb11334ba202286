//! Budget model
//!
//! A spending limit for one category in one calendar month. At most one budget
//! exists per (category, month, year); the service layer enforces that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::money::Money;
use super::period::MonthPeriod;

pub const MIN_BUDGET_YEAR: i32 = 2000;
pub const MAX_BUDGET_YEAR: i32 = 2100;

/// A monthly budget for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Category name this budget applies to
    pub category: String,

    /// Month (1-12)
    pub month: u32,

    /// Year (2000-2100)
    pub year: i32,

    /// Budgeted amount
    pub amount: Money,

    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget
    pub fn new(category: impl Into<String>, month: u32, year: i32, amount: Money) -> Self {
        Self {
            id: BudgetId::new(),
            category: category.into().trim().to_string(),
            month,
            year,
            amount,
            created_at: Utc::now(),
        }
    }

    /// The calendar month this budget covers
    pub fn period(&self) -> MonthPeriod {
        MonthPeriod::new(self.year, self.month)
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.category.trim().is_empty() {
            return Err(BudgetValidationError::EmptyCategory);
        }
        if !(1..=12).contains(&self.month) {
            return Err(BudgetValidationError::InvalidMonth(self.month));
        }
        if !(MIN_BUDGET_YEAR..=MAX_BUDGET_YEAR).contains(&self.year) {
            return Err(BudgetValidationError::InvalidYear(self.year));
        }
        if self.amount.is_negative() {
            return Err(BudgetValidationError::NegativeAmount);
        }
        Ok(())
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyCategory,
    InvalidMonth(u32),
    InvalidYear(i32),
    NegativeAmount,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Select a category"),
            Self::InvalidMonth(m) => write!(f, "Invalid month: {} (expected 1-12)", m),
            Self::InvalidYear(y) => write!(
                f,
                "Invalid year: {} (expected {}-{})",
                y, MIN_BUDGET_YEAR, MAX_BUDGET_YEAR
            ),
            Self::NegativeAmount => write!(f, "Budget amount cannot be negative"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_budget() {
        let budget = Budget::new(" Groceries ", 3, 2024, Money::from_cents(50000));
        assert_eq!(budget.category, "Groceries");
        assert!(budget.validate().is_ok());
        assert_eq!(budget.period().to_string(), "2024-03");
    }

    #[test]
    fn test_validation_errors() {
        let mut budget = Budget::new("Food", 13, 2024, Money::from_cents(100));
        assert_eq!(budget.validate(), Err(BudgetValidationError::InvalidMonth(13)));

        budget.month = 1;
        budget.year = 1999;
        assert_eq!(budget.validate(), Err(BudgetValidationError::InvalidYear(1999)));

        budget.year = 2024;
        budget.amount = Money::from_cents(-1);
        assert_eq!(budget.validate(), Err(BudgetValidationError::NegativeAmount));

        let empty = Budget::new("  ", 1, 2024, Money::zero());
        assert_eq!(empty.validate(), Err(BudgetValidationError::EmptyCategory));
    }
}
