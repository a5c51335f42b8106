#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
pub use twoday::domain::advisor::{AdvisorParams, AnalysisMode};
use twoday::domain::error::TwodayError;
pub use twoday::domain::ohlcv::PriceBar;
use twoday::domain::transaction::{Side, Transaction};
use twoday::ports::history_port::HistoryPort;
use twoday::ports::ledger_port::LedgerPort;

pub const SMALL_PARAMS: AdvisorParams = AdvisorParams {
    ma_short_period: 3,
    ma_long_period: 5,
    mode: AnalysisMode::Short,
};

pub struct MockHistoryPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
    pub calls: Cell<usize>,
}

impl MockHistoryPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl HistoryPort for MockHistoryPort {
    fn source_name(&self) -> &str {
        "mock"
    }

    fn fetch_history(&self, symbol: &str) -> Result<Vec<PriceBar>, TwodayError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TwodayError::DataSource {
                source_name: "mock".into(),
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| TwodayError::NoData {
                symbol: symbol.to_string(),
            })
    }
}

pub struct MockLedger {
    pub transactions: Vec<Transaction>,
}

impl LedgerPort for MockLedger {
    fn load_transactions(&self) -> Result<Vec<Transaction>, TwodayError> {
        Ok(self.transactions.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// One bar per day from 2024-01-01: `flat` bars at 100, then `tail` closes.
pub fn bars_with_tail(flat: usize, tail: &[f64]) -> Vec<PriceBar> {
    let start = date(2024, 1, 1);
    std::iter::repeat_n(100.0, flat)
        .chain(tail.iter().copied())
        .enumerate()
        .map(|(i, close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000,
        })
        .collect()
}

pub fn tx(date_str: &str, symbol: &str, side: Side, shares: u64, price: f64) -> Transaction {
    Transaction {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        symbol: symbol.to_string(),
        side,
        shares,
        price,
    }
}

pub fn write_history_csv(dir: &Path, symbol: &str, bars: &[PriceBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
