//! Per-bar record of the tracked strategy variables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::{LifecyclePhase, StrategyState};

/// Snapshot taken at the end of each evaluated bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub bar_index: u64,
    pub date: NaiveDate,
    pub phase: LifecyclePhase,
    pub entry_price: Option<f64>,
    pub stop_loss_price: Option<f64>,
    pub last_signal_bar: Option<u64>,
    /// Raw detector verdict, whether or not it led to an order.
    pub signal_fired: bool,
}

impl BarTrace {
    pub fn capture(bar_index: u64, date: NaiveDate, state: &StrategyState, signal_fired: bool) -> Self {
        Self {
            bar_index,
            date,
            phase: state.kind(),
            entry_price: state.entry_price(),
            stop_loss_price: state.stop_loss_price(),
            last_signal_bar: state.last_signal_bar(),
            signal_fired,
        }
    }
}
