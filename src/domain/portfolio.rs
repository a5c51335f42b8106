//! Holdings and P&L derived from the transaction ledger.
//!
//! Average-cost method: a sell removes `shares * avg_cost` from the cost
//! basis and books the difference to its proceeds as realized P&L.
//! Transactions are applied in date order; same-day entries keep ledger order.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::error::TwodayError;
use crate::domain::transaction::{Side, Transaction};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub shares: u64,
    pub total_cost: f64,
    pub realized_pnl: f64,
}

impl Holding {
    fn empty(symbol: &str) -> Self {
        Holding {
            symbol: symbol.to_string(),
            shares: 0,
            total_cost: 0.0,
            realized_pnl: 0.0,
        }
    }

    pub fn avg_cost(&self) -> f64 {
        if self.shares > 0 {
            self.total_cost / self.shares as f64
        } else {
            0.0
        }
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.market_value(price) - self.total_cost
    }

    /// Applies one transaction and returns the P&L it realized.
    fn apply(&mut self, tx: &Transaction) -> Result<f64, TwodayError> {
        match tx.side {
            Side::Buy => {
                self.shares += tx.shares;
                self.total_cost += tx.amount();
                Ok(0.0)
            }
            Side::Sell => {
                if tx.shares > self.shares {
                    return Err(TwodayError::Ledger {
                        reason: format!(
                            "sell of {} {} on {} exceeds held {}",
                            tx.shares, tx.symbol, tx.date, self.shares
                        ),
                    });
                }
                let cost_basis = tx.shares as f64 * self.avg_cost();
                let realized = tx.amount() - cost_basis;
                self.shares -= tx.shares;
                self.total_cost = if self.shares == 0 {
                    0.0
                } else {
                    self.total_cost - cost_basis
                };
                self.realized_pnl += realized;
                Ok(realized)
            }
        }
    }
}

fn chronological(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|t| t.date);
    sorted
}

/// Open holdings (shares > 0), sorted by symbol.
pub fn derive_holdings(transactions: &[Transaction]) -> Result<Vec<Holding>, TwodayError> {
    let mut book: BTreeMap<&str, Holding> = BTreeMap::new();
    for tx in chronological(transactions) {
        book.entry(tx.symbol.as_str())
            .or_insert_with(|| Holding::empty(&tx.symbol))
            .apply(tx)?;
    }
    Ok(book.into_values().filter(|h| h.shares > 0).collect())
}

/// Realized P&L of sells dated within `[from, to]`. Cost basis is tracked
/// across the whole ledger, including entries outside the range.
pub fn realized_pnl(
    transactions: &[Transaction],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<f64, TwodayError> {
    let mut book: HashMap<&str, Holding> = HashMap::new();
    let mut realized = 0.0;
    for tx in chronological(transactions) {
        let booked = book
            .entry(tx.symbol.as_str())
            .or_insert_with(|| Holding::empty(&tx.symbol))
            .apply(tx)?;
        if tx.side == Side::Sell && tx.date >= from && tx.date <= to {
            realized += booked;
        }
    }
    Ok(realized)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioMetrics {
    pub total_cost: f64,
    pub market_value: f64,
    pub unrealized_pnl: f64,
    pub roi_pct: f64,
}

/// Holdings without a price in `prices` are valued at cost.
pub fn portfolio_metrics(holdings: &[Holding], prices: &HashMap<String, f64>) -> PortfolioMetrics {
    let total_cost: f64 = holdings.iter().map(|h| h.total_cost).sum();
    let market_value: f64 = holdings
        .iter()
        .map(|h| match prices.get(&h.symbol) {
            Some(&price) => h.market_value(price),
            None => h.total_cost,
        })
        .sum();
    let unrealized_pnl = market_value - total_cost;
    let roi_pct = if total_cost > 0.0 {
        unrealized_pnl / total_cost * 100.0
    } else {
        0.0
    };

    PortfolioMetrics {
        total_cost,
        market_value,
        unrealized_pnl,
        roi_pct,
    }
}
