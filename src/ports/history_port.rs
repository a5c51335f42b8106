//! Price-history source port.
//!
//! Implementations return bars sorted ascending by date with no duplicate
//! dates; retry and fallback policy stays inside the adapter.

use crate::domain::error::TwodayError;
use crate::domain::ohlcv::PriceBar;

pub trait HistoryPort {
    /// Short name used in logs and errors.
    fn source_name(&self) -> &str;

    fn fetch_history(&self, symbol: &str) -> Result<Vec<PriceBar>, TwodayError>;

    /// Most recent close, if any history exists.
    fn last_close(&self, symbol: &str) -> Result<Option<f64>, TwodayError> {
        Ok(self.fetch_history(symbol)?.last().map(|b| b.close))
    }
}
