//! Transaction ledger port.

use crate::domain::error::TwodayError;
use crate::domain::transaction::Transaction;

pub trait LedgerPort {
    fn load_transactions(&self) -> Result<Vec<Transaction>, TwodayError>;
}
