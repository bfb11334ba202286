//! Calendar month periods
//!
//! Budgets and insight reports are keyed by calendar month, written `YYYY-MM`.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpendError;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthPeriod {
    pub year: i32,
    pub month: u32,
}

impl MonthPeriod {
    /// Create a month period; `month` is expected to be 1-12
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The current local month
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// First day of the month
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The previous month
    pub fn previous(&self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The following month
    pub fn next(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthPeriod {
    type Err = SpendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SpendError::Validation(format!("Invalid month '{}'; use YYYY-MM", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        if !(1..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self::new(year, month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let period: MonthPeriod = "2024-03".parse().unwrap();
        assert_eq!(period, MonthPeriod::new(2024, 3));
        assert_eq!(period.to_string(), "2024-03");

        assert!("2024-13".parse::<MonthPeriod>().is_err());
        assert!("2024".parse::<MonthPeriod>().is_err());
        assert!("abcd-01".parse::<MonthPeriod>().is_err());
    }

    #[test]
    fn test_date_range() {
        let feb = MonthPeriod::new(2024, 2);
        assert_eq!(feb.start_date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.end_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec = MonthPeriod::new(2023, 12);
        assert_eq!(dec.end_date(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_previous_wraps_year() {
        assert_eq!(MonthPeriod::new(2024, 1).previous(), MonthPeriod::new(2023, 12));
        assert_eq!(MonthPeriod::new(2024, 5).previous(), MonthPeriod::new(2024, 4));
        assert_eq!(MonthPeriod::new(2024, 12).next(), MonthPeriod::new(2025, 1));
    }

    #[test]
    fn test_contains() {
        let period = MonthPeriod::new(2024, 3);
        assert!(period.contains(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
    }
}
