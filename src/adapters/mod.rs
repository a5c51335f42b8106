//! Concrete adapter implementations for ports.

pub mod csv_history_adapter;
pub mod csv_ledger_adapter;
pub mod fallback_history;
pub mod file_config_adapter;
