//! Moving-average series over daily closes.
//!
//! A `MovingAverageSeries` is positionally aligned with the bars it was
//! computed from: `values[i]` belongs to `bars[i]`. Warmup entries are `None`
//! rather than zero so that "no data" never reads as a price.

pub mod sma;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageSeries {
    pub period: usize,
    pub values: Vec<Option<f64>>,
}

impl MovingAverageSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Value aligned with the final bar; `None` while still warming up.
    pub fn latest(&self) -> Option<f64> {
        self.values.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// The most recent non-`None` value, if the warmup has completed.
    pub fn last_value(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }
}

impl fmt::Display for MovingAverageSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MA({})", self.period)
    }
}
