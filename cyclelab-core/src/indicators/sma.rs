//! Simple Moving Average (SMA) of close prices.
//!
//! First valid value at index period-1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let mut result = vec![f64::NAN; closes.len()];
        // A NaN close anywhere in the window makes the mean NaN.
        for (start, window) in closes.windows(self.period).enumerate() {
            result[start + self.period - 1] = window_mean(window);
        }
        result
    }
}

/// Arithmetic mean of one full window, summed from scratch.
///
/// The incremental engine calls the same function so both paths produce
/// bit-identical averages.
pub(crate) fn window_mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}
