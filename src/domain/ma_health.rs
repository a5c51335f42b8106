//! Moving-average arrangement diagnosis.
//!
//! Compares the last close with a 20-day and a 60-day average. Price above a
//! rising stack (price > MA20 > MA60) is bullish, the mirror image is bearish,
//! anything else is neutral. The health score only carries the technical
//! term; fundamentals are not part of the price history.

use std::fmt;

use serde::Serialize;

use crate::domain::error::TwodayError;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::ohlcv::{validate_chronological, PriceBar};

pub const HEALTH_MA_SHORT: usize = 20;
pub const HEALTH_MA_LONG: usize = 60;

const BASE_SCORE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaTrend {
    Bullish,
    Bearish,
    Neutral,
}

impl MaTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaTrend::Bullish => "bullish",
            MaTrend::Bearish => "bearish",
            MaTrend::Neutral => "neutral",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            MaTrend::Bullish => "price is above both averages; trend is up",
            MaTrend::Bearish => "price is below both averages; trend is down",
            MaTrend::Neutral => "averages are tangled; direction unclear, keep watching",
        }
    }

    /// Weight of the arrangement in the health score.
    pub fn score_term(&self) -> u8 {
        match self {
            MaTrend::Bullish => 30,
            MaTrend::Bearish => 5,
            MaTrend::Neutral => 15,
        }
    }
}

impl fmt::Display for MaTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Healthy,
    Fair,
    Watch,
    Warning,
}

impl HealthStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => HealthStatus::Healthy,
            60..=79 => HealthStatus::Fair,
            40..=59 => HealthStatus::Watch,
            _ => HealthStatus::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Fair => "FAIR",
            HealthStatus::Watch => "WATCH",
            HealthStatus::Warning => "WARNING",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaArrangement {
    pub price: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub trend: MaTrend,
}

impl MaArrangement {
    pub fn classify(price: f64, ma_short: f64, ma_long: f64) -> Self {
        let trend = if price > ma_short && ma_short > ma_long {
            MaTrend::Bullish
        } else if price < ma_short && ma_short < ma_long {
            MaTrend::Bearish
        } else {
            MaTrend::Neutral
        };
        Self {
            price,
            ma_short,
            ma_long,
            trend,
        }
    }

    pub fn health_score(&self) -> u8 {
        (BASE_SCORE + self.trend.score_term()).min(100)
    }

    pub fn health_status(&self) -> HealthStatus {
        HealthStatus::from_score(self.health_score())
    }
}

/// Arrangement at the last bar, or `None` until the longer average has
/// warmed up.
pub fn analyze_ma_arrangement(
    bars: &[PriceBar],
    short_period: usize,
    long_period: usize,
) -> Result<Option<MaArrangement>, TwodayError> {
    validate_chronological(bars)?;
    let short = calculate_sma(bars, short_period)?;
    let long = calculate_sma(bars, long_period)?;

    let (Some(last), Some(ma_short), Some(ma_long)) = (bars.last(), short.latest(), long.latest())
    else {
        return Ok(None);
    };
    Ok(Some(MaArrangement::classify(last.close, ma_short, ma_long)))
}
