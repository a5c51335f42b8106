//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod two_day_rule;
pub mod advisor;
pub mod ma_health;
pub mod position_size;
pub mod advice_cache;
pub mod watchlist;
pub mod transaction;
pub mod portfolio;
pub mod config_validation;
pub mod error;
