//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for twoday.
#[derive(Debug, thiserror::Error)]
pub enum TwodayError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientBars { bars: usize, minimum: usize },

    #[error("history out of order at bar {index}: {current} does not follow {previous}")]
    UnorderedHistory {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("data source {source_name} failed: {reason}")]
    DataSource { source_name: String, reason: String },

    #[error("all {attempts} history sources failed for {symbol}")]
    AllSourcesFailed { symbol: String, attempts: usize },

    #[error("ledger error: {reason}")]
    Ledger { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TwodayError> for std::process::ExitCode {
    fn from(err: &TwodayError) -> Self {
        let code: u8 = match err {
            TwodayError::Io(_) => 1,
            TwodayError::ConfigParse { .. }
            | TwodayError::ConfigMissing { .. }
            | TwodayError::ConfigInvalid { .. } => 2,
            TwodayError::DataSource { .. }
            | TwodayError::AllSourcesFailed { .. }
            | TwodayError::Ledger { .. } => 3,
            TwodayError::InvalidArgument { .. } => 4,
            TwodayError::InsufficientBars { .. }
            | TwodayError::UnorderedHistory { .. }
            | TwodayError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
