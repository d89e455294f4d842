//! Risk-budget sizer
//!
//! Risk a fixed fraction of cash between entry and stop, with the stop distance
//! capped as a fraction of the entry price.

use crate::config::{CycleBottomParams, MinSizePolicy};
use crate::sizers::PositionSizer;

/// Fixed-fractional risk sizer with a stop-distance cap.
///
/// # Formula
/// ```text
/// risk_amount   = cash * risk_pct
/// risk_per_unit = entry - stop
/// size          = floor(risk_amount / risk_per_unit)
/// if risk_per_unit > entry * max_risk_pct:
///     size      = floor(risk_amount / (entry * max_risk_pct))
/// ```
///
/// # Example
/// - Cash: $10,000, risk 2% ($200)
/// - Entry $99, stop $98: $1 per unit
/// - Distance $1 is within 5% of entry ($4.95)
/// - Size: 200 units
#[derive(Debug, Clone)]
pub struct RiskBudgetSizer {
    risk_pct: f64,
    max_risk_pct: f64,
    min_size_policy: MinSizePolicy,
}

impl RiskBudgetSizer {
    pub fn new(risk_pct: f64, max_risk_pct: f64, min_size_policy: MinSizePolicy) -> Self {
        assert!(risk_pct > 0.0 && risk_pct <= 1.0, "risk_pct must be in (0, 1]");
        assert!(
            max_risk_pct > 0.0 && max_risk_pct <= 1.0,
            "max_risk_pct must be in (0, 1]"
        );
        Self {
            risk_pct,
            max_risk_pct,
            min_size_policy,
        }
    }

    pub fn from_params(params: &CycleBottomParams) -> Self {
        Self::new(params.risk_pct, params.max_risk_pct, params.min_size_policy)
    }
}

impl PositionSizer for RiskBudgetSizer {
    fn name(&self) -> &str {
        "risk_budget"
    }

    fn size(&self, entry_price: f64, stop_loss: f64, cash: f64) -> u64 {
        // Stop at or above entry: no defined risk per unit.
        if stop_loss >= entry_price {
            return 0;
        }

        let risk_amount = cash * self.risk_pct;
        let risk_per_unit = entry_price - stop_loss;
        if risk_per_unit <= 0.0 || risk_per_unit.is_nan() {
            return 0;
        }

        let mut size = (risk_amount / risk_per_unit).floor();

        let max_distance = entry_price * self.max_risk_pct;
        if risk_per_unit > max_distance {
            size = (risk_amount / max_distance).floor();
        }

        // NaN cash lands here too.
        if size.is_nan() || size <= 0.0 {
            return match self.min_size_policy {
                MinSizePolicy::ClampToOne => 1,
                MinSizePolicy::Skip => 0,
            };
        }

        size as u64
    }
}
