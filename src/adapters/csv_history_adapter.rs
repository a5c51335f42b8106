//! CSV price-history adapter.
//!
//! Reads `<base_path>/<symbol>.csv` with the header
//! `date,open,high,low,close,volume`.

use crate::domain::error::TwodayError;
use crate::domain::ohlcv::{validate_chronological, PriceBar};
use crate::ports::history_port::HistoryPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvHistoryAdapter {
    base_path: PathBuf,
    name: String,
}

impl CsvHistoryAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        let name = format!("csv:{}", base_path.display());
        Self { base_path, name }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn source_error(&self, reason: String) -> TwodayError {
        TwodayError::DataSource {
            source_name: self.name.clone(),
            reason,
        }
    }

    fn field<T: FromStr>(
        &self,
        record: &csv::StringRecord,
        index: usize,
        column: &str,
        line: u64,
    ) -> Result<T, TwodayError>
    where
        T::Err: std::fmt::Display,
    {
        let raw = record
            .get(index)
            .ok_or_else(|| self.source_error(format!("line {line}: missing {column} column")))?;
        raw.trim()
            .parse()
            .map_err(|e| self.source_error(format!("line {line}: invalid {column} value: {e}")))
    }

    /// Prices must be finite and positive, with low <= high.
    fn check_prices(&self, bar: &PriceBar, line: u64) -> Result<(), TwodayError> {
        let prices = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ];
        for (column, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(self.source_error(format!(
                    "line {line}: {column} must be a positive number, got {value}"
                )));
            }
        }
        if bar.low > bar.high {
            return Err(self.source_error(format!(
                "line {line}: low {} above high {}",
                bar.low, bar.high
            )));
        }
        Ok(())
    }
}

impl HistoryPort for CsvHistoryAdapter {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn fetch_history(&self, symbol: &str) -> Result<Vec<PriceBar>, TwodayError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| self.source_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| self.source_error(format!("CSV parse error: {}", e)))?;
            let line = record.position().map_or(0, |p| p.line());

            let date_str: String = self.field(&record, 0, "date", line)?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .map_err(|e| self.source_error(format!("line {line}: invalid date format: {e}")))?;

            let bar = PriceBar {
                date,
                open: self.field(&record, 1, "open", line)?,
                high: self.field(&record, 2, "high", line)?,
                low: self.field(&record, 3, "low", line)?,
                close: self.field(&record, 4, "close", line)?,
                volume: self.field(&record, 5, "volume", line)?,
            };
            self.check_prices(&bar, line)?;
            bars.push(bar);
        }

        if bars.is_empty() {
            return Err(TwodayError::NoData {
                symbol: symbol.to_string(),
            });
        }

        bars.sort_by_key(|b| b.date);
        validate_chronological(&bars)?;
        Ok(bars)
    }
}
