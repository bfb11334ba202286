//! Transaction detection from extracted document text
//!
//! Regex and line heuristics only. Amounts must carry a currency marker
//! (`RM`, `MYR`, `USD` or `$`) so that account numbers, reference IDs and
//! phone numbers are never read as money. The first valid date anywhere in
//! the text is applied to every candidate.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use tracing::debug;

use crate::models::{CandidateTransaction, Money, PLACEHOLDER_DESCRIPTION};

/// Currency assigned when a line names none
pub const DEFAULT_CURRENCY: &str = "MYR";

/// Integer-part digits beyond this are treated as an identifier, not money
pub const MAX_AMOUNT_DIGITS: usize = 12;

/// Largest accepted amount: 99,999,999.99
pub const MAX_AMOUNT: Money = Money::from_cents(9_999_999_999);

/// Descriptions are capped at this many characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:RM|MYR|USD|\$)\s*(-?[0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?)")
            .expect("invalid amount regex")
    })
}

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)([0-9]{1,2})[/\-]([0-9]{1,2})[/\-]([0-9]{2,4})",
            r"|([0-9]{4})[/\-]([0-9]{1,2})[/\-]([0-9]{1,2})",
            r"|([0-9]{1,2})\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+([0-9]{2,4})",
        ))
        .expect("invalid date regex")
    })
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

/// Detects candidate transactions in free-form text
///
/// Detection never fails: malformed input degrades to an empty result (blank
/// text) or a single zero-amount placeholder the user can edit.
#[derive(Debug, Clone)]
pub struct TransactionDetector {
    default_currency: String,
    today: Option<NaiveDate>,
}

impl Default for TransactionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionDetector {
    /// Create a detector with the MYR fallback currency
    pub fn new() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.to_string(),
            today: None,
        }
    }

    /// Set the fallback currency
    pub fn with_default_currency(mut self, currency: &str) -> Self {
        let currency = currency.trim();
        if !currency.is_empty() {
            self.default_currency = currency.to_uppercase();
        }
        self
    }

    /// Pin the date used when the text contains none
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Detect candidates in possibly-missing text; `None` behaves like blank text
    pub fn detect_optional(&self, text: Option<&str>) -> Vec<CandidateTransaction> {
        text.map(|t| self.detect(t)).unwrap_or_default()
    }

    /// Detect candidate transactions in `text`
    ///
    /// Returns an empty vector for blank text and at least one candidate
    /// otherwise, in line order and left-to-right within a line.
    pub fn detect(&self, text: &str) -> Vec<CandidateTransaction> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let date = find_dates(trimmed)
            .into_iter()
            .next()
            .unwrap_or_else(|| self.today());

        let mut candidates = Vec::new();
        let mut line_count = 0usize;

        for line in trimmed.lines().map(str::trim).filter(|l| !l.is_empty()) {
            line_count += 1;
            let amounts = find_amounts(line);
            if amounts.is_empty() {
                continue;
            }

            let currency = infer_currency(line, &self.default_currency);
            let description = describe_line(line);

            for amount in amounts {
                candidates.push(CandidateTransaction {
                    date,
                    amount: amount.abs(),
                    currency: currency.clone(),
                    description: description.clone(),
                });
            }
        }

        debug!(
            lines = line_count,
            candidates = candidates.len(),
            "scanned document text"
        );

        if candidates.is_empty() {
            candidates.push(CandidateTransaction {
                date: self.today(),
                amount: Money::zero(),
                currency: self.default_currency.clone(),
                description: PLACEHOLDER_DESCRIPTION.to_string(),
            });
        }

        candidates
    }
}

/// Detect candidates with the default detector
pub fn detect_transactions(text: &str) -> Vec<CandidateTransaction> {
    TransactionDetector::new().detect(text)
}

/// All valid calendar dates in `text`, in order of appearance
///
/// Matches `D/M/Y` (or `-`), `YYYY-MM-DD` (or `/`) and `D Mon YYYY`. Two-digit
/// years are read as 20xx. Impossible dates such as 32/01/2024 are skipped.
pub fn find_dates(text: &str) -> Vec<NaiveDate> {
    date_regex()
        .captures_iter(text)
        .filter_map(|caps| parse_date_captures(&caps))
        .collect()
}

fn parse_date_captures(caps: &Captures<'_>) -> Option<NaiveDate> {
    let num = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };
    let year = |i: usize| -> Option<i32> {
        let y: i32 = caps.get(i)?.as_str().parse().ok()?;
        Some(if y < 100 { y + 2000 } else { y })
    };

    if caps.get(1).is_some() {
        return NaiveDate::from_ymd_opt(year(3)?, num(2)?, num(1)?);
    }

    if caps.get(4).is_some() {
        let y: i32 = caps.get(4)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(y, num(5)?, num(6)?);
    }

    if caps.get(7).is_some() {
        let prefix = caps.get(8)?.as_str().to_lowercase();
        let month = MONTH_ABBREVIATIONS
            .iter()
            .position(|m| *m == prefix)
            .map(|idx| idx as u32 + 1)?;
        return NaiveDate::from_ymd_opt(year(9)?, month, num(7)?);
    }

    None
}

/// Accepted currency-prefixed amounts on one line, left to right
///
/// A token is skipped when its integer part has more than
/// [`MAX_AMOUNT_DIGITS`] digits, when it is negative, or when it exceeds
/// [`MAX_AMOUNT`]. Thousands separators are removed before parsing.
pub fn find_amounts(line: &str) -> Vec<Money> {
    amount_regex()
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| parse_amount_token(m.as_str()))
        .collect()
}

fn parse_amount_token(raw: &str) -> Option<Money> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let integer_part = raw.split('.').next().unwrap_or(raw);
    let digits = integer_part.chars().filter(char::is_ascii_digit).count();
    if digits > MAX_AMOUNT_DIGITS {
        return None;
    }

    let amount = Money::parse(raw).ok()?;
    if amount.is_negative() || amount > MAX_AMOUNT {
        return None;
    }

    Some(amount)
}

/// Currency named anywhere on the line, not only next to the amount
pub fn infer_currency(line: &str, default_currency: &str) -> String {
    let upper = line.to_uppercase();
    if upper.contains("USD") || upper.contains('$') {
        "USD".to_string()
    } else if upper.contains("RM") || upper.contains("MYR") {
        "MYR".to_string()
    } else {
        default_currency.to_string()
    }
}

/// The line with every amount token removed and whitespace collapsed
pub fn describe_line(line: &str) -> String {
    let stripped = amount_regex().replace_all(line, "");
    let collapsed = whitespace_regex().replace_all(&stripped, " ");
    let description: String = collapsed.trim().chars().take(MAX_DESCRIPTION_CHARS).collect();

    if description.is_empty() {
        PLACEHOLDER_DESCRIPTION.to_string()
    } else {
        description
    }
}
