//! Indicator engine: moving average, lower envelope and crossover signs.
//!
//! Two views of the same numbers:
//! - Batch indicators implement [`Indicator`] and compute a full series from a
//!   bar slice (NaN during warmup). Used for analysis and as the reference the
//!   incremental engine is checked against.
//! - [`IndicatorEngine`] extends an [`IndicatorSeries`] one bar at a time as the
//!   strategy receives bars.

pub mod crossover;
pub mod engine;
pub mod envelope;
pub mod sma;

pub use crossover::{cross_above, crossover_signs};
pub use engine::{IndicatorEngine, IndicatorSeries};
pub use envelope::LowerEnvelope;
pub use sma::Sma;

use crate::domain::Bar;

/// Trait for batch indicators.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on price data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_40").
    fn name(&self) -> &str;

    /// Number of leading NaN values before output becomes valid.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the whole bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev close (or close for the first bar), high = max(open, close) + 1,
/// low = min(open, close) - 1.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::new(
                i as u64,
                base_date + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
