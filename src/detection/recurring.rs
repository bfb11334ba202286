//! Recurring expense detection
//!
//! Rule-based and read-only. A group of transactions is recurring when it
//! shares a normalized description, has at least three members, every amount
//! is within ±5% of the group median, and the mean gap between consecutive
//! dates is weekly (5-9 days) or monthly (27-34 days).
//!
//! Only the mean gap is checked. Irregular gaps that happen to average out
//! to a weekly or monthly figure still qualify.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Money, RecurringInterval, Transaction, TransactionId};

/// Allowed relative deviation from the group median
pub const AMOUNT_TOLERANCE: f64 = 0.05;

/// Fewer repetitions than this are treated as coincidence
pub const MIN_OCCURRENCES: usize = 3;

pub const WEEKLY_DAYS: (f64, f64) = (5.0, 9.0);
pub const MONTHLY_DAYS: (f64, f64) = (27.0, 34.0);

/// Read-only view of a persisted transaction used for grouping
pub trait RecurringInput {
    fn transaction_id(&self) -> TransactionId;
    fn transaction_date(&self) -> NaiveDate;
    fn transaction_amount(&self) -> Money;
    fn transaction_description(&self) -> Option<&str>;
}

/// Minimal transaction record accepted by the recognizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionForDetection {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub amount: Money,
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionForDetection {
    pub fn new(
        id: TransactionId,
        date: NaiveDate,
        amount: Money,
        description: Option<&str>,
    ) -> Self {
        Self {
            id,
            date,
            amount,
            description: description.map(str::to_string),
        }
    }
}

impl RecurringInput for TransactionForDetection {
    fn transaction_id(&self) -> TransactionId {
        self.id
    }

    fn transaction_date(&self) -> NaiveDate {
        self.date
    }

    fn transaction_amount(&self) -> Money {
        self.amount
    }

    fn transaction_description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl RecurringInput for Transaction {
    fn transaction_id(&self) -> TransactionId {
        self.id
    }

    fn transaction_date(&self) -> NaiveDate {
        self.date
    }

    fn transaction_amount(&self) -> Money {
        self.amount
    }

    fn transaction_description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl From<&Transaction> for TransactionForDetection {
    fn from(txn: &Transaction) -> Self {
        Self::new(txn.id, txn.date, txn.amount, txn.description.as_deref())
    }
}

/// A group of transactions that passed every recurring rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringGroup {
    /// Normalized description shared by all members
    pub key: String,
    pub interval: RecurringInterval,
    /// Median amount, rounded to the cent
    pub median_amount: Money,
    /// Members in date order
    pub transaction_ids: Vec<TransactionId>,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// An item paired with its recurring suggestion flag
///
/// Serializes as the item's own fields plus `recurring_suggestion`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithRecurringSuggestion<T> {
    #[serde(flatten)]
    pub item: T,
    pub recurring_suggestion: bool,
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

/// Grouping key: trimmed, lowercased, internal whitespace collapsed
///
/// A missing description yields an empty key, which is never grouped.
pub fn normalize_description(description: Option<&str>) -> String {
    match description {
        Some(d) => whitespace_regex()
            .replace_all(d.trim(), " ")
            .to_lowercase(),
        None => String::new(),
    }
}

/// All groups that qualify as recurring, ordered by key
pub fn find_recurring_groups<T: RecurringInput>(transactions: &[T]) -> Vec<RecurringGroup> {
    let mut by_key: BTreeMap<String, Vec<&T>> = BTreeMap::new();
    for txn in transactions {
        let key = normalize_description(txn.transaction_description());
        if key.is_empty() {
            continue;
        }
        by_key.entry(key).or_default().push(txn);
    }

    let candidate_groups = by_key.len();
    let groups: Vec<RecurringGroup> = by_key
        .into_iter()
        .filter_map(|(key, members)| classify_group(key, members))
        .collect();

    debug!(
        transactions = transactions.len(),
        candidate_groups,
        recurring_groups = groups.len(),
        "recurring detection complete"
    );

    groups
}

/// IDs of every transaction belonging to at least one recurring group
pub fn detect_recurring_transaction_ids<T: RecurringInput>(
    transactions: &[T],
) -> HashSet<TransactionId> {
    find_recurring_groups(transactions)
        .into_iter()
        .flat_map(|g| g.transaction_ids)
        .collect()
}

/// Copies of `transactions` with a `recurring_suggestion` flag attached
pub fn attach_recurring_suggestions<T: RecurringInput + Clone>(
    transactions: &[T],
) -> Vec<WithRecurringSuggestion<T>> {
    let recurring_ids = detect_recurring_transaction_ids(transactions);
    transactions
        .iter()
        .map(|txn| WithRecurringSuggestion {
            recurring_suggestion: recurring_ids.contains(&txn.transaction_id()),
            item: txn.clone(),
        })
        .collect()
}

fn classify_group<T: RecurringInput>(key: String, mut members: Vec<&T>) -> Option<RecurringGroup> {
    if members.len() < MIN_OCCURRENCES {
        return None;
    }

    members.sort_by(|a, b| {
        a.transaction_date()
            .cmp(&b.transaction_date())
            .then_with(|| a.transaction_id().as_uuid().cmp(b.transaction_id().as_uuid()))
    });

    let median = median_cents(members.iter().map(|t| t.transaction_amount().cents()));
    let amounts_stable = members
        .iter()
        .all(|t| within_tolerance(t.transaction_amount().cents() as f64, median));
    if !amounts_stable {
        return None;
    }

    let dates: Vec<NaiveDate> = members.iter().map(|t| t.transaction_date()).collect();
    let interval = classify_interval(&dates)?;

    Some(RecurringGroup {
        key,
        interval,
        median_amount: Money::from_cents(median.round() as i64),
        transaction_ids: members.iter().map(|t| t.transaction_id()).collect(),
        first_date: dates[0],
        last_date: dates[dates.len() - 1],
    })
}

/// Standard median; even counts average the two middle values
fn median_cents(amounts: impl Iterator<Item = i64>) -> f64 {
    let mut sorted: Vec<i64> = amounts.collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    }
}

/// A non-positive reference only matches exactly
fn within_tolerance(amount: f64, reference: f64) -> bool {
    if reference <= 0.0 {
        return amount == reference;
    }
    (amount - reference).abs() / reference <= AMOUNT_TOLERANCE
}

/// Classify date-sorted dates by their mean gap in days
pub fn classify_interval(sorted_dates: &[NaiveDate]) -> Option<RecurringInterval> {
    if sorted_dates.len() < 2 {
        return None;
    }

    let gaps: Vec<i64> = sorted_dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .collect();
    let mean_gap = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;

    if (WEEKLY_DAYS.0..=WEEKLY_DAYS.1).contains(&mean_gap) {
        Some(RecurringInterval::Weekly)
    } else if (MONTHLY_DAYS.0..=MONTHLY_DAYS.1).contains(&mean_gap) {
        Some(RecurringInterval::Monthly)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(description: Option<&str>, amount_cents: i64, date: &str) -> TransactionForDetection {
        TransactionForDetection::new(
            TransactionId::new(),
            date.parse().unwrap(),
            Money::from_cents(amount_cents),
            description,
        )
    }

    fn netflix_history() -> Vec<TransactionForDetection> {
        vec![
            txn(Some("Netflix"), 4500, "2024-01-05"),
            txn(Some("netflix"), 4600, "2024-02-05"),
            txn(Some("NETFLIX"), 4400, "2024-03-06"),
        ]
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description(Some("  Netflix   Premium\t")), "netflix premium");
        assert_eq!(normalize_description(Some("   ")), "");
        assert_eq!(normalize_description(None), "");
    }

    #[test]
    fn test_monthly_pattern_detected() {
        let history = netflix_history();
        let ids = detect_recurring_transaction_ids(&history);

        assert_eq!(ids.len(), 3);
        assert!(history.iter().all(|t| ids.contains(&t.id)));

        let groups = find_recurring_groups(&history);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "netflix");
        assert_eq!(groups[0].interval, RecurringInterval::Monthly);
        assert_eq!(groups[0].median_amount, Money::from_cents(4500));
        assert_eq!(groups[0].transaction_ids[0], history[0].id);
    }

    #[test]
    fn test_weekly_pattern_detected() {
        let history = vec![
            txn(Some("Gym"), 2000, "2024-01-01"),
            txn(Some("Gym"), 2000, "2024-01-08"),
            txn(Some("Gym"), 2000, "2024-01-15"),
            txn(Some("Gym"), 2000, "2024-01-22"),
        ];
        let groups = find_recurring_groups(&history);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].interval, RecurringInterval::Weekly);
    }

    /// Dates at the given day offsets from 2024-01-01
    fn dates_at(offsets: &[i64]) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        offsets
            .iter()
            .map(|d| start + chrono::Duration::days(*d))
            .collect()
    }

    #[test]
    fn test_interval_bounds_are_inclusive() {
        assert_eq!(classify_interval(&dates_at(&[0, 5, 10])), Some(RecurringInterval::Weekly));
        assert_eq!(classify_interval(&dates_at(&[0, 9, 18])), Some(RecurringInterval::Weekly));
        assert_eq!(classify_interval(&dates_at(&[0, 27, 54])), Some(RecurringInterval::Monthly));
        assert_eq!(classify_interval(&dates_at(&[0, 34, 68])), Some(RecurringInterval::Monthly));
    }

    #[test]
    fn test_mean_gap_just_outside_bounds_rejected() {
        // 4.5, 9.5, 26.5 and 34.5 days
        assert_eq!(classify_interval(&dates_at(&[0, 4, 9])), None);
        assert_eq!(classify_interval(&dates_at(&[0, 9, 19])), None);
        assert_eq!(classify_interval(&dates_at(&[0, 26, 53])), None);
        assert_eq!(classify_interval(&dates_at(&[0, 34, 69])), None);
    }

    #[test]
    fn test_group_on_monthly_upper_bound_detected() {
        let history = vec![
            txn(Some("Insurance"), 12000, "2024-01-01"),
            txn(Some("Insurance"), 12000, "2024-02-04"),
            txn(Some("Insurance"), 12000, "2024-03-09"),
        ];
        let groups = find_recurring_groups(&history);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].interval, RecurringInterval::Monthly);
    }

    #[test]
    fn test_two_occurrences_not_enough() {
        let mut history = netflix_history();
        history.pop();
        assert!(detect_recurring_transaction_ids(&history).is_empty());
    }

    #[test]
    fn test_amount_outlier_rejects_group() {
        let mut history = netflix_history();
        history[2].amount = Money::from_cents(5000);
        assert!(detect_recurring_transaction_ids(&history).is_empty());
    }

    #[test]
    fn test_amount_tolerance_boundary_is_inclusive() {
        let history = vec![
            txn(Some("Water"), 10000, "2024-01-01"),
            txn(Some("Water"), 10000, "2024-02-01"),
            txn(Some("Water"), 10500, "2024-03-01"),
        ];
        assert_eq!(detect_recurring_transaction_ids(&history).len(), 3);
    }

    #[test]
    fn test_even_count_median_averages_middle_values() {
        assert_eq!(median_cents([100, 400, 200, 300].into_iter()), 250.0);
        assert_eq!(median_cents([300, 100, 200].into_iter()), 200.0);
    }

    #[test]
    fn test_fortnightly_gap_rejected() {
        let history = vec![
            txn(Some("Cleaner"), 8000, "2024-01-01"),
            txn(Some("Cleaner"), 8000, "2024-01-16"),
            txn(Some("Cleaner"), 8000, "2024-01-31"),
        ];
        assert!(detect_recurring_transaction_ids(&history).is_empty());
    }

    #[test]
    fn test_irregular_gaps_with_monthly_mean_qualify() {
        // Gaps of 2 and 58 days average to 30
        let history = vec![
            txn(Some("Insurance"), 12000, "2024-01-01"),
            txn(Some("Insurance"), 12000, "2024-01-03"),
            txn(Some("Insurance"), 12000, "2024-03-01"),
        ];
        let groups = find_recurring_groups(&history);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].interval, RecurringInterval::Monthly);
    }

    #[test]
    fn test_zero_median_requires_exact_match() {
        let exact = vec![
            txn(Some("Free trial"), 0, "2024-01-01"),
            txn(Some("Free trial"), 0, "2024-02-01"),
            txn(Some("Free trial"), 0, "2024-03-01"),
        ];
        assert_eq!(detect_recurring_transaction_ids(&exact).len(), 3);

        let mut mixed = exact.clone();
        mixed.push(txn(Some("Free trial"), 1, "2024-04-01"));
        mixed.push(txn(Some("Free trial"), 0, "2024-05-01"));
        assert!(detect_recurring_transaction_ids(&mixed).is_empty());
    }

    #[test]
    fn test_blank_descriptions_never_grouped() {
        let history = vec![
            txn(None, 1000, "2024-01-01"),
            txn(Some(" "), 1000, "2024-02-01"),
            txn(None, 1000, "2024-03-01"),
            txn(Some(""), 1000, "2024-04-01"),
        ];
        assert!(detect_recurring_transaction_ids(&history).is_empty());
    }

    #[test]
    fn test_unrelated_transactions_unaffected() {
        let mut history = netflix_history();
        history.push(txn(Some("Groceries"), 8000, "2024-02-10"));
        let ids = detect_recurring_transaction_ids(&history);
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&history[3].id));
    }

    #[test]
    fn test_order_does_not_matter() {
        let history = netflix_history();
        let mut reversed = history.clone();
        reversed.reverse();
        assert_eq!(
            detect_recurring_transaction_ids(&history),
            detect_recurring_transaction_ids(&reversed)
        );
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<TransactionForDetection> = Vec::new();
        assert!(detect_recurring_transaction_ids(&empty).is_empty());
        assert!(attach_recurring_suggestions(&empty).is_empty());
    }

    #[test]
    fn test_attach_suggestions_leaves_input_untouched() {
        let mut history = netflix_history();
        history.push(txn(Some("Groceries"), 8000, "2024-02-10"));
        let before = history.clone();

        let flagged = attach_recurring_suggestions(&history);

        assert_eq!(history, before);
        assert_eq!(flagged.len(), history.len());
        for (out, original) in flagged.iter().zip(&history) {
            assert_eq!(&out.item, original);
        }
        assert!(flagged[..3].iter().all(|f| f.recurring_suggestion));
        assert!(!flagged[3].recurring_suggestion);
        assert_eq!(attach_recurring_suggestions(&history), flagged);
    }

    #[test]
    fn test_flag_serializes_flattened() {
        let flagged = attach_recurring_suggestions(&netflix_history());
        let json = serde_json::to_value(&flagged[0]).unwrap();
        assert_eq!(json["description"], "Netflix");
        assert_eq!(json["date"], "2024-01-05");
        assert_eq!(json["recurring_suggestion"], true);
    }

    #[test]
    fn test_works_on_persisted_transactions() {
        let history: Vec<Transaction> = netflix_history()
            .into_iter()
            .map(|t| {
                let mut txn = Transaction::new(t.date, t.amount, "MYR");
                txn.description = t.description;
                txn
            })
            .collect();
        assert_eq!(detect_recurring_transaction_ids(&history).len(), 3);
    }
}
