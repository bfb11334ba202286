//! Budget service
//!
//! Monthly spending limits per category name, and the spent-vs-budget view
//! built from stored transactions.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::error::{SpendError, SpendResult};
use crate::models::{Budget, BudgetId, Money, MonthPeriod};
use crate::storage::Storage;

/// Input for creating a budget
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    pub category: String,
    pub month: u32,
    pub year: i32,
    pub amount: Money,
}

/// Fields to change on an existing budget; at least one must be set
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    pub category: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub amount: Option<Money>,
}

impl UpdateBudgetInput {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.month.is_none() && self.year.is_none() && self.amount.is_none()
    }
}

/// A budget together with what has been spent against it
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent: Money,
}

impl BudgetStatus {
    pub fn remaining(&self) -> Money {
        self.budget.amount - self.spent
    }

    pub fn is_over(&self) -> bool {
        self.spent > self.budget.amount
    }
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a budget; one per category and month
    pub fn create(&self, input: CreateBudgetInput) -> SpendResult<Budget> {
        let budget = Budget::new(input.category, input.month, input.year, input.amount);
        budget
            .validate()
            .map_err(|e| SpendError::Validation(e.to_string()))?;

        self.ensure_unique(&budget)?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        info!(id = %budget.id, category = %budget.category, period = %budget.period(), "created budget");
        Ok(budget)
    }

    /// Update a budget
    pub fn update(&self, id: BudgetId, input: UpdateBudgetInput) -> SpendResult<Budget> {
        if input.is_empty() {
            return Err(SpendError::Validation("No fields to update".into()));
        }

        let mut budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| SpendError::budget_not_found(id.to_string()))?;

        if let Some(category) = input.category {
            budget.category = category.trim().to_string();
        }
        if let Some(month) = input.month {
            budget.month = month;
        }
        if let Some(year) = input.year {
            budget.year = year;
        }
        if let Some(amount) = input.amount {
            budget.amount = amount;
        }

        budget
            .validate()
            .map_err(|e| SpendError::Validation(e.to_string()))?;
        self.ensure_unique(&budget)?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        info!(id = %budget.id, "updated budget");
        Ok(budget)
    }

    /// Delete a budget, returning the removed row
    pub fn delete(&self, id: BudgetId) -> SpendResult<Budget> {
        let budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| SpendError::budget_not_found(id.to_string()))?;

        self.storage.budgets.delete(id)?;
        self.storage.budgets.save()?;

        info!(id = %id, "deleted budget");
        Ok(budget)
    }

    /// Find a budget by full ID or display ID
    pub fn find(&self, identifier: &str) -> SpendResult<Option<Budget>> {
        if let Ok(id) = identifier.parse::<BudgetId>() {
            return self.storage.budgets.get(id);
        }

        let prefix = identifier.trim();
        let prefix = prefix.strip_prefix("bud-").unwrap_or(prefix).to_lowercase();
        if prefix.is_empty() {
            return Ok(None);
        }

        let mut matches: Vec<Budget> = self
            .storage
            .budgets
            .get_all()?
            .into_iter()
            .filter(|b| b.id.as_uuid().simple().to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(SpendError::Validation(format!(
                "ID prefix '{}' is ambiguous ({} matches)",
                identifier, n
            ))),
        }
    }

    /// Budgets, newest month first, optionally restricted to a month and/or year
    pub fn list(&self, month: Option<u32>, year: Option<i32>) -> SpendResult<Vec<Budget>> {
        let mut budgets: Vec<Budget> = self
            .storage
            .budgets
            .get_all()?
            .into_iter()
            .filter(|b| month.map_or(true, |m| b.month == m))
            .filter(|b| year.map_or(true, |y| b.year == y))
            .collect();

        budgets.sort_by(|a, b| {
            b.period()
                .cmp(&a.period())
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(budgets)
    }

    /// Budgets for one month in creation order
    pub fn list_for_month(&self, period: MonthPeriod) -> SpendResult<Vec<Budget>> {
        let mut budgets = self.storage.budgets.get_for_month(period)?;
        budgets.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(budgets)
    }

    /// Total spent per category name in a month; uncategorized rows count as "Other"
    pub fn spent_by_category(&self, period: MonthPeriod) -> SpendResult<BTreeMap<String, Money>> {
        let transactions = self
            .storage
            .transactions
            .get_by_date_range(period.start_date(), period.end_date())?;

        let mut spent: BTreeMap<String, Money> = BTreeMap::new();
        for txn in &transactions {
            *spent.entry(txn.category_name().to_string()).or_default() += txn.amount;
        }
        Ok(spent)
    }

    /// Spent-vs-budget for every budget in a month
    pub fn status_for_month(&self, period: MonthPeriod) -> SpendResult<Vec<BudgetStatus>> {
        let spent = self.spent_by_category(period)?;

        Ok(self
            .list_for_month(period)?
            .into_iter()
            .map(|budget| BudgetStatus {
                spent: spent.get(&budget.category).copied().unwrap_or_default(),
                budget,
            })
            .collect())
    }

    fn ensure_unique(&self, budget: &Budget) -> SpendResult<()> {
        match self
            .storage
            .budgets
            .find(&budget.category, budget.month, budget.year)?
        {
            Some(existing) if existing.id != budget.id => Err(SpendError::Duplicate {
                entity_type: "Budget",
                identifier: format!("{} {}", budget.category, budget.period()),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpendPaths;
    use crate::models::Transaction;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(category: &str, month: u32, year: i32, cents: i64) -> CreateBudgetInput {
        CreateBudgetInput {
            category: category.into(),
            month,
            year,
            amount: Money::from_cents(cents),
        }
    }

    fn spend(storage: &Storage, date: (i32, u32, u32), cents: i64, category: Option<&str>) {
        let mut txn = Transaction::new(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            Money::from_cents(cents),
            "MYR",
        );
        txn.category = category.map(str::to_string);
        storage.transactions.upsert(txn).unwrap();
    }

    #[test]
    fn test_create_and_duplicate() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        service.create(input("Food", 3, 2024, 50000)).unwrap();
        let err = service.create(input("food", 3, 2024, 100)).unwrap_err();
        assert!(matches!(err, SpendError::Duplicate { .. }));

        service.create(input("Food", 4, 2024, 50000)).unwrap();
    }

    #[test]
    fn test_create_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        assert!(service.create(input("Food", 13, 2024, 100)).unwrap_err().is_validation());
        assert!(service.create(input("Food", 1, 1999, 100)).unwrap_err().is_validation());
        assert!(service.create(input("Food", 1, 2024, -1)).unwrap_err().is_validation());
        assert!(service.create(input(" ", 1, 2024, 100)).unwrap_err().is_validation());
    }

    #[test]
    fn test_update() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let budget = service.create(input("Food", 3, 2024, 50000)).unwrap();
        service.create(input("Transport", 3, 2024, 10000)).unwrap();

        assert!(service
            .update(budget.id, UpdateBudgetInput::default())
            .unwrap_err()
            .is_validation());

        let updated = service
            .update(
                budget.id,
                UpdateBudgetInput {
                    amount: Some(Money::from_cents(60000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount.cents(), 60000);

        let clash = service.update(
            budget.id,
            UpdateBudgetInput {
                category: Some("Transport".into()),
                ..Default::default()
            },
        );
        assert!(matches!(clash, Err(SpendError::Duplicate { .. })));
    }

    #[test]
    fn test_list_ordering_and_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.create(input("Food", 1, 2024, 100)).unwrap();
        service.create(input("Food", 3, 2024, 100)).unwrap();
        service.create(input("Food", 3, 2023, 100)).unwrap();

        let all = service.list(None, None).unwrap();
        let periods: Vec<_> = all.iter().map(|b| b.period().to_string()).collect();
        assert_eq!(periods, vec!["2024-03", "2024-01", "2023-03"]);

        assert_eq!(service.list(Some(3), None).unwrap().len(), 2);
        assert_eq!(service.list(Some(3), Some(2024)).unwrap().len(), 1);
    }

    #[test]
    fn test_status_for_month() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.create(input("Food", 3, 2024, 10000)).unwrap();
        service.create(input("Other", 3, 2024, 1000)).unwrap();

        spend(&storage, (2024, 3, 1), 6000, Some("Food"));
        spend(&storage, (2024, 3, 31), 5000, Some("Food"));
        spend(&storage, (2024, 4, 1), 9999, Some("Food"));
        spend(&storage, (2024, 3, 15), 500, None);

        let period = MonthPeriod::new(2024, 3);
        let spent = service.spent_by_category(period).unwrap();
        assert_eq!(spent["Food"], Money::from_cents(11000));
        assert_eq!(spent["Other"], Money::from_cents(500));

        let status = service.status_for_month(period).unwrap();
        assert_eq!(status.len(), 2);
        assert!(status[0].is_over());
        assert_eq!(status[0].remaining(), Money::from_cents(-1000));
        assert!(!status[1].is_over());
    }

    #[test]
    fn test_find_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let budget = service.create(input("Food", 3, 2024, 100)).unwrap();

        assert_eq!(service.find(&budget.id.to_string()).unwrap().unwrap().id, budget.id);
        service.delete(budget.id).unwrap();
        assert!(service.find(&budget.id.to_string()).unwrap().is_none());
        assert!(service.delete(budget.id).unwrap_err().is_not_found());
    }
}
