//! Bar: one OHLC observation delivered by the data feed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single time step of market data.
///
/// Bars are immutable once emitted and arrive ordered by `index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Monotonic position of the bar in the feed.
    pub index: u64,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(index: u64, date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            index,
            date,
            open,
            high,
            low,
            close,
        }
    }

    /// Returns true if any OHLC field is NaN.
    ///
    /// Void bars never reach the indicator history.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }
}
