//! Lower envelope: the moving average shifted down by a fixed percentage.

use super::sma::Sma;
use super::Indicator;
use crate::domain::Bar;

/// `sma(period) * (1 - envelope_pct / 100)`.
#[derive(Debug, Clone)]
pub struct LowerEnvelope {
    sma: Sma,
    factor: f64,
    name: String,
}

impl LowerEnvelope {
    pub fn new(period: usize, envelope_pct: f64) -> Self {
        assert!(
            (0.0..100.0).contains(&envelope_pct),
            "envelope_pct must be in [0, 100)"
        );
        Self {
            sma: Sma::new(period),
            factor: 1.0 - envelope_pct / 100.0,
            name: format!("lower_env_{period}_{envelope_pct}"),
        }
    }
}

impl Indicator for LowerEnvelope {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.sma.lookback()
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        self.sma
            .compute(bars)
            .into_iter()
            .map(|avg| avg * self.factor)
            .collect()
    }
}
