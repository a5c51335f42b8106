//! Strategy advisor: maps the two-day rule outcome on a short or long moving
//! average to an advisory status with a human-readable rationale.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::TwodayError;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::ohlcv::{validate_chronological, PriceBar};
use crate::domain::two_day_rule::{evaluate_two_day_rule, TwoDayOutcome, RULE_WINDOW};

pub const DEFAULT_MA_SHORT: usize = 18;
pub const DEFAULT_MA_LONG: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Short,
    Long,
}

impl FromStr for AnalysisMode {
    type Err = TwodayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(AnalysisMode::Short),
            "long" => Ok(AnalysisMode::Long),
            other => Err(TwodayError::InvalidArgument {
                reason: format!("unknown analysis mode '{other}' (expected short or long)"),
            }),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Short => f.write_str("short"),
            AnalysisMode::Long => f.write_str("long"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvisorParams {
    pub ma_short_period: usize,
    pub ma_long_period: usize,
    pub mode: AnalysisMode,
}

impl Default for AdvisorParams {
    fn default() -> Self {
        Self {
            ma_short_period: DEFAULT_MA_SHORT,
            ma_long_period: DEFAULT_MA_LONG,
            mode: AnalysisMode::Short,
        }
    }
}

impl AdvisorParams {
    /// Bars needed before any advice is given.
    pub fn required_bars(&self) -> usize {
        self.ma_short_period.max(self.ma_long_period) + RULE_WINDOW
    }

    pub fn primary_period(&self) -> usize {
        match self.mode {
            AnalysisMode::Short => self.ma_short_period,
            AnalysisMode::Long => self.ma_long_period,
        }
    }

    /// "short-term MA(18)" / "long-term MA(52)"
    pub fn ma_label(&self) -> String {
        let term = match self.mode {
            AnalysisMode::Short => "short-term",
            AnalysisMode::Long => "long-term",
        };
        format!("{term} MA({})", self.primary_period())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdviceStatus {
    Waiting,
    GiftBuy,
    WatchBreakout,
    WatchBreakdown,
    BullishConfirmed,
    BearishConfirmed,
    Consolidating,
    BullishTrend,
    BearishTrend,
}

impl AdviceStatus {
    pub const ALL: [AdviceStatus; 9] = [
        AdviceStatus::Waiting,
        AdviceStatus::GiftBuy,
        AdviceStatus::WatchBreakout,
        AdviceStatus::WatchBreakdown,
        AdviceStatus::BullishConfirmed,
        AdviceStatus::BearishConfirmed,
        AdviceStatus::Consolidating,
        AdviceStatus::BullishTrend,
        AdviceStatus::BearishTrend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceStatus::Waiting => "WAITING",
            AdviceStatus::GiftBuy => "GIFT_BUY",
            AdviceStatus::WatchBreakout => "WATCH_BREAKOUT",
            AdviceStatus::WatchBreakdown => "WATCH_BREAKDOWN",
            AdviceStatus::BullishConfirmed => "BULLISH_CONFIRMED",
            AdviceStatus::BearishConfirmed => "BEARISH_CONFIRMED",
            AdviceStatus::Consolidating => "CONSOLIDATING",
            AdviceStatus::BullishTrend => "BULLISH_TREND",
            AdviceStatus::BearishTrend => "BEARISH_TREND",
        }
    }

    pub fn is_bullish(&self) -> bool {
        match self {
            AdviceStatus::GiftBuy | AdviceStatus::BullishConfirmed | AdviceStatus::BullishTrend => {
                true
            }
            AdviceStatus::Waiting
            | AdviceStatus::WatchBreakout
            | AdviceStatus::WatchBreakdown
            | AdviceStatus::BearishConfirmed
            | AdviceStatus::Consolidating
            | AdviceStatus::BearishTrend => false,
        }
    }

    pub fn action(&self) -> &'static str {
        if self.is_bullish() {
            "consider entry / hold"
        } else {
            "reduce / stand aside"
        }
    }
}

impl fmt::Display for AdviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic colour for rendering. Red is up and green is down, as quoted on
/// the Taiwan exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorHint {
    Gray,
    Orange,
    Yellow,
    Amber,
    Red,
    Green,
    Silver,
    LightRed,
    DarkGreen,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyAdvice {
    pub status: AdviceStatus,
    pub advice: String,
    pub color_hint: ColorHint,
    pub reason: String,
}

impl StrategyAdvice {
    fn waiting() -> Self {
        StrategyAdvice {
            status: AdviceStatus::Waiting,
            advice: "insufficient data".into(),
            color_hint: ColorHint::Gray,
            reason: "not enough history for the configured moving averages".into(),
        }
    }
}

pub fn advise(bars: &[PriceBar], params: &AdvisorParams) -> Result<StrategyAdvice, TwodayError> {
    if bars.len() < params.required_bars() {
        return Ok(StrategyAdvice::waiting());
    }

    validate_chronological(bars)?;

    let short_ma = calculate_sma(bars, params.ma_short_period)?;
    let long_ma = calculate_sma(bars, params.ma_long_period)?;
    let primary = match params.mode {
        AnalysisMode::Short => &short_ma,
        AnalysisMode::Long => &long_ma,
    };

    // required_bars() guarantees the warmup is over.
    let Some(primary_ma) = primary.last_value() else {
        return Ok(StrategyAdvice::waiting());
    };

    let outcome = evaluate_two_day_rule(bars, primary_ma)?;
    let last_close = bars[bars.len() - 1].close;

    Ok(classify(outcome, last_close, primary_ma, &params.ma_label()))
}

fn classify(outcome: TwoDayOutcome, last_close: f64, primary_ma: f64, ma: &str) -> StrategyAdvice {
    let (status, color_hint, advice, reason) = match outcome {
        TwoDayOutcome::WashoutGift => (
            AdviceStatus::GiftBuy,
            ColorHint::Orange,
            format!(
                "Washout gift: price broke below the {ma} yesterday but did not make a new low today. \
                 This looks like a shakeout; an entry is reasonable."
            ),
            "breakdown without new low (shakeout confirmation)",
        ),
        TwoDayOutcome::BreakoutWatch => (
            AdviceStatus::WatchBreakout,
            ColorHint::Yellow,
            format!(
                "Price closed above the {ma} today (Day 1). If tomorrow's high exceeds today's high \
                 the breakout is confirmed."
            ),
            "initial breakout, awaiting day-2 confirmation",
        ),
        TwoDayOutcome::BreakdownWatch => (
            AdviceStatus::WatchBreakdown,
            ColorHint::Amber,
            format!(
                "Price closed below the {ma} today (Day 1). If tomorrow's low undercuts today's low \
                 the breakdown is confirmed."
            ),
            "initial breakdown, awaiting day-2 confirmation",
        ),
        TwoDayOutcome::BreakoutValidated => (
            AdviceStatus::BullishConfirmed,
            ColorHint::Red,
            format!(
                "Two-day rule confirmed: today's high cleared yesterday's high and price holds above \
                 the {ma}. A clear signal to buy or add."
            ),
            "held above the moving average on time and price",
        ),
        TwoDayOutcome::BreakdownValidated => (
            AdviceStatus::BearishConfirmed,
            ColorHint::Green,
            format!(
                "Two-day rule breakdown confirmed below the {ma}: today's low undercut yesterday's low. \
                 Reduce exposure or stand aside."
            ),
            "breakdown confirmed",
        ),
        TwoDayOutcome::BreakoutFailed => (
            AdviceStatus::Consolidating,
            ColorHint::Silver,
            format!(
                "Two-day rule failed: price crossed above the {ma} but made no new high. \
                 Wait and avoid heavy positions here."
            ),
            "false breakout or range-bound",
        ),
        TwoDayOutcome::TrendStable if last_close > primary_ma => (
            AdviceStatus::BullishTrend,
            ColorHint::LightRed,
            format!(
                "Price is trending steadily above the {ma}. Momentum is bullish; hold and watch the \
                 distance from the average."
            ),
            "stable uptrend",
        ),
        TwoDayOutcome::TrendStable => (
            AdviceStatus::BearishTrend,
            ColorHint::DarkGreen,
            format!(
                "Price is trading below the {ma}. The trend is weak; stand aside until the two-day \
                 rule turns bullish again."
            ),
            "stable downtrend",
        ),
    };

    StrategyAdvice {
        status,
        advice,
        color_hint,
        reason: reason.to_string(),
    }
}
