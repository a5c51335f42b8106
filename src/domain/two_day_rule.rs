//! Two-day validation rule.
//!
//! Classifies how the close has moved relative to a single reference moving
//! average over the last three bars (`day_before`, `yesterday`, `today`).
//!
//! A cross that happened on `yesterday` is confirmed or rejected by `today`
//! (Day 2). A cross that happens on `today` is only a Day-1 watch. Day-2
//! checks run first and the first match wins.
//!
//! The rule is deliberately asymmetric: a breakdown that fails to make a new
//! low is a washout ("gift"), while a breakout that fails to make a new high
//! is only a failed breakout.

use std::fmt;

use serde::Serialize;

use crate::domain::error::TwodayError;
use crate::domain::ohlcv::{validate_chronological, PriceBar};

pub const RULE_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TwoDayOutcome {
    BreakoutValidated,
    BreakoutFailed,
    WashoutGift,
    BreakdownValidated,
    BreakoutWatch,
    BreakdownWatch,
    TrendStable,
}

impl TwoDayOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TwoDayOutcome::BreakoutValidated => "BREAKOUT_VALIDATED",
            TwoDayOutcome::BreakoutFailed => "BREAKOUT_FAILED",
            TwoDayOutcome::WashoutGift => "WASHOUT_GIFT",
            TwoDayOutcome::BreakdownValidated => "BREAKDOWN_VALIDATED",
            TwoDayOutcome::BreakoutWatch => "BREAKOUT_WATCH",
            TwoDayOutcome::BreakdownWatch => "BREAKDOWN_WATCH",
            TwoDayOutcome::TrendStable => "TREND_STABLE",
        }
    }
}

impl fmt::Display for TwoDayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn evaluate_two_day_rule(bars: &[PriceBar], ma_value: f64) -> Result<TwoDayOutcome, TwodayError> {
    if bars.len() < RULE_WINDOW {
        return Err(TwodayError::InsufficientBars {
            bars: bars.len(),
            minimum: RULE_WINDOW,
        });
    }

    let offset = bars.len() - RULE_WINDOW;
    let window = &bars[offset..];
    validate_chronological(window).map_err(|e| match e {
        TwodayError::UnorderedHistory {
            index,
            previous,
            current,
        } => TwodayError::UnorderedHistory {
            index: offset + index,
            previous,
            current,
        },
        other => other,
    })?;

    let day_before = &window[0];
    let yesterday = &window[1];
    let today = &window[2];

    // Day 2: yesterday crossed above.
    if yesterday.close > ma_value && day_before.close <= ma_value {
        if today.high > yesterday.high {
            return Ok(TwoDayOutcome::BreakoutValidated);
        }
        return Ok(TwoDayOutcome::BreakoutFailed);
    }

    // Day 2: yesterday crossed below.
    if yesterday.close < ma_value && day_before.close >= ma_value {
        if today.low >= yesterday.low {
            return Ok(TwoDayOutcome::WashoutGift);
        }
        return Ok(TwoDayOutcome::BreakdownValidated);
    }

    if today.close > ma_value && yesterday.close <= ma_value {
        return Ok(TwoDayOutcome::BreakoutWatch);
    }

    if today.close < ma_value && yesterday.close >= ma_value {
        return Ok(TwoDayOutcome::BreakdownWatch);
    }

    Ok(TwoDayOutcome::TrendStable)
}
