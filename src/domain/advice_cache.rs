//! Per-symbol cache of the last computed advice.
//!
//! Entries are stamped with the history they were computed from. A refresh
//! recomputes only when the stamp or the advisor parameters change; callers
//! may also invalidate explicitly. The advisor itself knows nothing of this.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::advisor::{advise, AdviceStatus, AdvisorParams, StrategyAdvice};
use crate::domain::error::TwodayError;
use crate::domain::ohlcv::PriceBar;

/// Identifies the history an entry was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStamp {
    pub last_date: Option<NaiveDate>,
    pub bar_count: usize,
}

impl HistoryStamp {
    pub fn of(bars: &[PriceBar]) -> Self {
        Self {
            last_date: bars.last().map(|b| b.date),
            bar_count: bars.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedAdvice {
    pub advice: StrategyAdvice,
    pub stamp: HistoryStamp,
    pub params: AdvisorParams,
}

#[derive(Debug, Default)]
pub struct AdviceCache {
    entries: HashMap<String, CachedAdvice>,
}

impl AdviceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<&StrategyAdvice> {
        self.entries.get(symbol).map(|e| &e.advice)
    }

    pub fn status(&self, symbol: &str) -> Option<AdviceStatus> {
        self.get(symbol).map(|a| a.status)
    }

    pub fn insert(&mut self, symbol: &str, entry: CachedAdvice) {
        self.entries.insert(symbol.to_string(), entry);
    }

    /// Return the cached advice for `symbol`, recomputing it if `bars` or
    /// `params` differ from what the entry was built with.
    pub fn refresh(
        &mut self,
        symbol: &str,
        bars: &[PriceBar],
        params: &AdvisorParams,
    ) -> Result<&StrategyAdvice, TwodayError> {
        let stamp = HistoryStamp::of(bars);
        let fresh = self
            .entries
            .get(symbol)
            .is_some_and(|e| e.stamp == stamp && e.params == *params);

        if fresh {
            debug!(symbol, "advice cache hit");
        } else {
            debug!(symbol, bars = bars.len(), "advice cache miss, recomputing");
            let advice = advise(bars, params)?;
            self.entries.insert(
                symbol.to_string(),
                CachedAdvice {
                    advice,
                    stamp,
                    params: *params,
                },
            );
        }

        Ok(&self.entries[symbol].advice)
    }

    pub fn invalidate(&mut self, symbol: &str) -> bool {
        self.entries.remove(symbol).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
