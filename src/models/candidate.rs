//! Candidate transactions produced by the detector
//!
//! Candidates have no identity. They are shown for review and turned into
//! persisted [`Transaction`](super::Transaction) rows only when confirmed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// Description used when a line carries nothing but amounts
pub const PLACEHOLDER_DESCRIPTION: &str = "Transaction";

/// A detector-produced transaction guess awaiting user review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTransaction {
    /// Transaction date (serialized as YYYY-MM-DD)
    pub date: NaiveDate,
    /// Non-negative amount
    pub amount: Money,
    /// Currency code inferred from the line
    pub currency: String,
    /// Line text with amount tokens removed
    pub description: String,
}

impl CandidateTransaction {
    /// True for the zero-amount row emitted when nothing was detected
    pub fn is_placeholder(&self) -> bool {
        self.amount.is_zero() && self.description == PLACEHOLDER_DESCRIPTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_iso_date() {
        let candidate = CandidateTransaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
            amount: Money::from_cents(4500),
            currency: "MYR".into(),
            description: "Paid for lunch".into(),
        };
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["date"], "2024-03-12");
        assert_eq!(json["amount"], 4500);
        assert!(!candidate.is_placeholder());
    }
}
