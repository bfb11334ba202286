//! Budget repository for JSON storage
//!
//! Manages loading and saving monthly category budgets to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{SpendError, SpendResult};
use crate::models::{Budget, BudgetId, MonthPeriod};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

fn lock_error(e: impl std::fmt::Display) -> SpendError {
    SpendError::Storage(format!("Failed to acquire budget lock: {}", e))
}

/// Oldest month first, then by category name
fn sort_by_period(budgets: &mut [Budget]) {
    budgets.sort_by(|a, b| {
        a.period()
            .cmp(&b.period())
            .then_with(|| a.category.cmp(&b.category))
    });
}

impl BudgetRepository {
    /// Create a new budget repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> SpendResult<()> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut budgets = self.budgets.write().map_err(lock_error)?;
        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert(budget.id, budget);
        }

        Ok(())
    }

    /// Save budgets to disk
    pub fn save(&self) -> SpendResult<()> {
        let budgets = self.budgets.read().map_err(lock_error)?;

        let mut list: Vec<_> = budgets.values().cloned().collect();
        sort_by_period(&mut list);

        write_json_atomic(&self.path, &BudgetData { budgets: list })
    }

    /// Get a budget by ID
    pub fn get(&self, id: BudgetId) -> SpendResult<Option<Budget>> {
        let budgets = self.budgets.read().map_err(lock_error)?;
        Ok(budgets.get(&id).cloned())
    }

    /// Get all budgets ordered by month then category
    pub fn get_all(&self) -> SpendResult<Vec<Budget>> {
        let budgets = self.budgets.read().map_err(lock_error)?;

        let mut list: Vec<_> = budgets.values().cloned().collect();
        sort_by_period(&mut list);
        Ok(list)
    }

    /// Find the budget for a category in a month (category match is case-insensitive)
    pub fn find(&self, category: &str, month: u32, year: i32) -> SpendResult<Option<Budget>> {
        let budgets = self.budgets.read().map_err(lock_error)?;
        let category = category.trim();

        Ok(budgets
            .values()
            .find(|b| {
                b.month == month && b.year == year && b.category.eq_ignore_ascii_case(category)
            })
            .cloned())
    }

    /// All budgets for one month, ordered by category
    pub fn get_for_month(&self, period: MonthPeriod) -> SpendResult<Vec<Budget>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|b| b.period() == period)
            .collect())
    }

    /// Insert or update a budget
    pub fn upsert(&self, budget: Budget) -> SpendResult<()> {
        let mut budgets = self.budgets.write().map_err(lock_error)?;
        budgets.insert(budget.id, budget);
        Ok(())
    }

    /// Delete a budget, returning whether it existed
    pub fn delete(&self, id: BudgetId) -> SpendResult<bool> {
        let mut budgets = self.budgets.write().map_err(lock_error)?;
        Ok(budgets.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Budget::new("Groceries", 3, 2024, Money::from_cents(50000)))
            .unwrap();

        assert!(repo.find("groceries", 3, 2024).unwrap().is_some());
        assert!(repo.find("Groceries", 4, 2024).unwrap().is_none());
    }

    #[test]
    fn test_get_for_month_sorted_by_category() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Budget::new("Transport", 3, 2024, Money::from_cents(100))).unwrap();
        repo.upsert(Budget::new("Food", 3, 2024, Money::from_cents(100))).unwrap();
        repo.upsert(Budget::new("Food", 4, 2024, Money::from_cents(100))).unwrap();

        let march = repo.get_for_month(MonthPeriod::new(2024, 3)).unwrap();
        let names: Vec<_> = march.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(names, vec!["Food", "Transport"]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let budget = Budget::new("Food", 3, 2024, Money::from_cents(30000));
        let id = budget.id;
        repo.upsert(budget).unwrap();
        repo.save().unwrap();

        let repo2 = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().amount.cents(), 30000);

        assert!(repo2.delete(id).unwrap());
        assert!(repo2.get_all().unwrap().is_empty());
    }
}
