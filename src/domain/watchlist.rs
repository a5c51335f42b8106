//! Watchlist grouping by advisory status.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::domain::advice_cache::AdviceCache;
use crate::domain::advisor::AdviceStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatchCategory {
    GiftBuy,
    BullishConfirmed,
    BearishConfirmed,
    WatchBreakout,
    WatchBreakdown,
    BullishTrend,
    BearishTrend,
    Others,
}

impl WatchCategory {
    /// Display order.
    pub const ORDER: [WatchCategory; 8] = [
        WatchCategory::GiftBuy,
        WatchCategory::BullishConfirmed,
        WatchCategory::BearishConfirmed,
        WatchCategory::WatchBreakout,
        WatchCategory::WatchBreakdown,
        WatchCategory::BullishTrend,
        WatchCategory::BearishTrend,
        WatchCategory::Others,
    ];

    pub fn for_status(status: Option<AdviceStatus>) -> Self {
        match status {
            Some(AdviceStatus::GiftBuy) => WatchCategory::GiftBuy,
            Some(AdviceStatus::BullishConfirmed) => WatchCategory::BullishConfirmed,
            Some(AdviceStatus::BearishConfirmed) => WatchCategory::BearishConfirmed,
            Some(AdviceStatus::WatchBreakout) => WatchCategory::WatchBreakout,
            Some(AdviceStatus::WatchBreakdown) => WatchCategory::WatchBreakdown,
            Some(AdviceStatus::BullishTrend) => WatchCategory::BullishTrend,
            Some(AdviceStatus::BearishTrend) => WatchCategory::BearishTrend,
            Some(AdviceStatus::Consolidating) | Some(AdviceStatus::Waiting) | None => {
                WatchCategory::Others
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchCategory::GiftBuy => "GIFT_BUY",
            WatchCategory::BullishConfirmed => "BULLISH_CONFIRMED",
            WatchCategory::BearishConfirmed => "BEARISH_CONFIRMED",
            WatchCategory::WatchBreakout => "WATCH_BREAKOUT",
            WatchCategory::WatchBreakdown => "WATCH_BREAKDOWN",
            WatchCategory::BullishTrend => "BULLISH_TREND",
            WatchCategory::BearishTrend => "BEARISH_TREND",
            WatchCategory::Others => "OTHERS",
        }
    }
}

impl fmt::Display for WatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchGroup {
    pub category: WatchCategory,
    pub symbols: Vec<String>,
}

/// Bucket `symbols` by their cached status. Every category is present, in
/// `WatchCategory::ORDER`; pinned symbols come first inside a group and the
/// input order is otherwise kept.
pub fn group_by_status(symbols: &[String], pinned: &[String], cache: &AdviceCache) -> Vec<WatchGroup> {
    let pinned: HashSet<&str> = pinned.iter().map(String::as_str).collect();

    let mut groups: Vec<WatchGroup> = WatchCategory::ORDER
        .iter()
        .map(|&category| WatchGroup {
            category,
            symbols: Vec::new(),
        })
        .collect();

    for symbol in symbols {
        let category = WatchCategory::for_status(cache.status(symbol));
        if let Some(group) = groups.iter_mut().find(|g| g.category == category) {
            group.symbols.push(symbol.clone());
        }
    }

    for group in &mut groups {
        // Stable sort keeps input order among equals.
        group
            .symbols
            .sort_by_key(|s| !pinned.contains(s.as_str()));
    }

    groups
}
