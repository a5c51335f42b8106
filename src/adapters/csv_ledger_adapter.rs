//! CSV transaction ledger: `date,symbol,side,shares,price`.

use crate::domain::error::TwodayError;
use crate::domain::transaction::{Side, Transaction};
use crate::ports::ledger_port::LedgerPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

pub struct CsvLedgerAdapter {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    date: String,
    symbol: String,
    side: String,
    shares: u64,
    price: f64,
}

impl CsvLedgerAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl LedgerPort for CsvLedgerAdapter {
    fn load_transactions(&self) -> Result<Vec<Transaction>, TwodayError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| TwodayError::Ledger {
                reason: format!("failed to open {}: {}", self.path.display(), e),
            })?;

        let mut transactions = Vec::new();
        for row in rdr.deserialize::<LedgerRow>() {
            let row = row.map_err(|e| TwodayError::Ledger {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
                TwodayError::Ledger {
                    reason: format!("invalid date '{}': {}", row.date, e),
                }
            })?;
            let side: Side = row.side.parse()?;
            if row.price <= 0.0 {
                return Err(TwodayError::Ledger {
                    reason: format!("non-positive price for {} on {}", row.symbol, row.date),
                });
            }

            transactions.push(Transaction {
                date,
                symbol: row.symbol.to_uppercase(),
                side,
                shares: row.shares,
                price: row.price,
            });
        }

        Ok(transactions)
    }
}
