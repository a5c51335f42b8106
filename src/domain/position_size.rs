//! Fractional-risk position sizing.
//!
//! Sizes a trade so that hitting the stop loses at most `risk_fraction` of
//! total assets. Malformed risk input never errors; it yields zero shares.

use std::cmp::Ordering;

/// Share of total assets that one stopped-out trade may lose.
pub const DEFAULT_RISK_FRACTION: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskParams {
    pub total_assets: f64,
    pub risk_fraction: f64,
    pub stop_loss_pct: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            total_assets: 1_000_000.0,
            risk_fraction: DEFAULT_RISK_FRACTION,
            stop_loss_pct: 7.0,
        }
    }
}

impl RiskParams {
    pub fn max_loss(&self) -> f64 {
        self.total_assets * self.risk_fraction
    }

    /// Size at `entry_price` with the stop placed `stop_loss_pct` below it.
    pub fn size_at(&self, entry_price: f64) -> u64 {
        let stop = stop_price_from_pct(entry_price, self.stop_loss_pct);
        shares_within(self.max_loss(), entry_price, stop)
    }
}

pub fn position_size(total_assets: f64, entry_price: f64, stop_loss_price: f64) -> u64 {
    position_size_with_risk(total_assets, entry_price, stop_loss_price, DEFAULT_RISK_FRACTION)
}

pub fn position_size_with_risk(
    total_assets: f64,
    entry_price: f64,
    stop_loss_price: f64,
    risk_fraction: f64,
) -> u64 {
    shares_within(total_assets * risk_fraction, entry_price, stop_loss_price)
}

/// Whole shares whose loss from entry to stop stays within `max_loss`.
fn shares_within(max_loss: f64, entry_price: f64, stop_loss_price: f64) -> u64 {
    // NaN compares as None and sizes to zero as well.
    if entry_price.partial_cmp(&stop_loss_price) != Some(Ordering::Greater) {
        return 0;
    }
    let risk_per_share = entry_price - stop_loss_price;
    let shares = (max_loss / risk_per_share).floor();
    if shares.is_finite() && shares > 0.0 {
        shares as u64
    } else {
        0
    }
}

/// entry * (1 - pct / 100)
pub fn stop_price_from_pct(entry_price: f64, stop_loss_pct: f64) -> f64 {
    entry_price * (1.0 - stop_loss_pct / 100.0)
}
