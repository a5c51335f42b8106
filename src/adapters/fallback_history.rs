//! Ordered ladder of history sources.
//!
//! Each source is tried in turn; the first success wins. Ordering problems
//! in a source's data count as a failure of that source, so a later mirror
//! can still answer.

use tracing::{debug, warn};

use crate::domain::error::TwodayError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::history_port::HistoryPort;

pub struct FallbackHistoryAdapter {
    sources: Vec<Box<dyn HistoryPort>>,
}

impl FallbackHistoryAdapter {
    pub fn new(sources: Vec<Box<dyn HistoryPort>>) -> Self {
        Self { sources }
    }

    pub fn push(&mut self, source: Box<dyn HistoryPort>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl HistoryPort for FallbackHistoryAdapter {
    fn source_name(&self) -> &str {
        "fallback"
    }

    fn fetch_history(&self, symbol: &str) -> Result<Vec<PriceBar>, TwodayError> {
        for source in &self.sources {
            match source.fetch_history(symbol) {
                Ok(bars) => {
                    debug!(symbol, source = source.source_name(), bars = bars.len(), "history fetched");
                    return Ok(bars);
                }
                Err(e) => {
                    warn!(symbol, source = source.source_name(), error = %e, "history source failed");
                }
            }
        }

        Err(TwodayError::AllSourcesFailed {
            symbol: symbol.to_string(),
            attempts: self.sources.len(),
        })
    }
}
