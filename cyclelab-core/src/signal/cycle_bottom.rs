//! Cycle-bottom detector: a dip to the lower envelope confirmed by a cross-up.
//!
//! Three conditions, all required:
//! 1. Dip: `low <= lower_envelope * 1.005` (near-touches count).
//! 2. Confirmed cross-up: close crossed above the average `confirm_bars` bars ago
//!    (this bar when `confirm_bars` is 0).
//! 3. Spacing: more than `min_bars_between` bars since the previous signal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CycleBottomParams;
use crate::domain::Bar;
use crate::indicators::IndicatorSeries;

/// Multiplier on the envelope that still counts as a touch (0.5% above).
pub const DIP_TOLERANCE: f64 = 1.005;

/// Per-condition outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BottomCheck {
    pub dipped: bool,
    pub cross_confirmed: bool,
    pub spacing_ok: bool,
}

impl BottomCheck {
    pub fn fires(&self) -> bool {
        self.dipped && self.cross_confirmed && self.spacing_ok
    }
}

/// A fired entry signal and the prices it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottomSignal {
    pub bar_index: u64,
    pub date: NaiveDate,
    pub close: f64,
    pub low: f64,
    pub lower_envelope: f64,
}

#[derive(Debug, Clone)]
pub struct CycleBottomDetector {
    required_history: usize,
    confirm_bars: usize,
    min_bars_between: u64,
}

impl CycleBottomDetector {
    pub fn new(params: &CycleBottomParams) -> Self {
        Self {
            required_history: params.required_history(),
            confirm_bars: params.confirm_bars,
            min_bars_between: params.min_bars_between(),
        }
    }

    pub fn name(&self) -> &str {
        "cycle_bottom"
    }

    /// Bars required before any evaluation: `max(P, confirm_bars + 1)`.
    pub fn warmup_bars(&self) -> usize {
        self.required_history
    }

    pub fn min_bars_between(&self) -> u64 {
        self.min_bars_between
    }

    /// Evaluate every condition for `bar`, which must be the latest bar in `series`.
    ///
    /// Returns `None` while history is insufficient.
    pub fn check(
        &self,
        bar: &Bar,
        series: &IndicatorSeries,
        last_signal_bar: Option<u64>,
    ) -> Option<BottomCheck> {
        if series.len() < self.required_history {
            return None;
        }
        let cur = series.last_pos()?;

        let dipped = series
            .lower_envelope(cur)
            .is_some_and(|env| bar.low <= env * DIP_TOLERANCE);

        // Never look further back than the history we have.
        let cross_confirmed = cur
            .checked_sub(self.confirm_bars)
            .and_then(|pos| series.cross_up(pos))
            .is_some_and(|sign| sign > 0.0);

        let spacing_ok = match last_signal_bar {
            None => true,
            Some(last) => bar.index.saturating_sub(last) > self.min_bars_between,
        };

        Some(BottomCheck {
            dipped,
            cross_confirmed,
            spacing_ok,
        })
    }

    /// Returns `Some(BottomSignal)` if a bottom fires on `bar`.
    pub fn evaluate(
        &self,
        bar: &Bar,
        series: &IndicatorSeries,
        last_signal_bar: Option<u64>,
    ) -> Option<BottomSignal> {
        if !self.check(bar, series, last_signal_bar)?.fires() {
            return None;
        }
        let lower_envelope = series.lower_envelope(series.last_pos()?)?;
        Some(BottomSignal {
            bar_index: bar.index,
            date: bar.date,
            close: bar.close,
            low: bar.low,
            lower_envelope,
        })
    }
}
