//! Port traits implemented by adapters.

pub mod config_port;
pub mod history_port;
pub mod ledger_port;
