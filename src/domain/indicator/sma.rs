//! Simple Moving Average.
//!
//! O(n) running-sum implementation.
//! SMA(n)[i] = (C[i-n+1] + ... + C[i]) / n
//! Warmup: first (n-1) entries are `None`.

use crate::domain::error::TwodayError;
use crate::domain::indicator::MovingAverageSeries;
use crate::domain::ohlcv::PriceBar;

pub fn calculate_sma(bars: &[PriceBar], period: usize) -> Result<MovingAverageSeries, TwodayError> {
    if period == 0 {
        return Err(TwodayError::InvalidArgument {
            reason: "moving average period must be positive".into(),
        });
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut window_sum: f64 = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        window_sum += bar.close;
        if i >= period {
            window_sum -= bars[i - period].close;
        }

        if i + 1 >= period {
            values.push(Some(window_sum / period as f64));
        } else {
            values.push(None);
        }
    }

    Ok(MovingAverageSeries { period, values })
}
