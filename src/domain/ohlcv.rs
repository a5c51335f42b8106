//! Daily price bar representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::TwodayError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Reject any bar whose date is not strictly after its predecessor.
pub fn validate_chronological(bars: &[PriceBar]) -> Result<(), TwodayError> {
    for (i, pair) in bars.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(TwodayError::UnorderedHistory {
                index: i + 1,
                previous: pair[0].date,
                current: pair[1].date,
            });
        }
    }
    Ok(())
}
