//! Cycle-bottom strategy: drives the state machine bar by bar.
//!
//! Per bar, in order:
//! 1. Extend the indicator series.
//! 2. Skip the bar while history is shorter than the detector warmup.
//! 3. Skip transitions while an order is in flight.
//! 4. Flat: on a bottom signal, size from the signal-bar close and envelope,
//!    then submit a buy.
//! 5. Long: exit on a cross-down, otherwise on close <= stop. If the broker
//!    holds nothing, reset to flat and evaluate step 4 on the same bar.
//!
//! Fill notifications arrive through [`CycleBottomStrategy::on_order_update`]
//! and are fully applied before the next bar.

use std::fmt;

use tracing::{debug, info, warn};

use super::state::{Phase, StrategyState};
use super::trace::BarTrace;
use crate::broker::Broker;
use crate::config::{ConfigError, CycleBottomParams};
use crate::domain::{Bar, OrderHandle, OrderSide, OrderStatus, OrderUpdate};
use crate::indicators::{IndicatorEngine, IndicatorSeries};
use crate::signal::{BottomCheck, CycleBottomDetector};
use crate::sizers::{PositionSizer, RiskBudgetSizer};

/// Why a closing order was sent. Cross-down is checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    CrossDown,
    StopLoss,
}

/// What happened on one call to [`CycleBottomStrategy::on_bar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarOutcome {
    /// Bar had NaN prices and was ignored entirely.
    Void,
    /// Not enough history to evaluate.
    Warmup,
    /// An order is in flight; no transition was evaluated.
    AwaitingOrder(OrderHandle),
    Hold,
    /// A bottom fired but the sizer returned 0.
    EntryRefused,
    EntrySubmitted { order: OrderHandle, size: u64 },
    ExitSubmitted {
        order: OrderHandle,
        size: u64,
        reason: ExitReason,
    },
    /// Broker reported no position while the strategy was long, and no
    /// entry fired on the same bar.
    Reconciled,
}

/// Stop set on entry fill: the lower of the previous bar's low and envelope.
pub fn conservative_stop(prev_low: f64, prev_envelope: f64) -> f64 {
    prev_low.min(prev_envelope)
}

pub struct CycleBottomStrategy {
    params: CycleBottomParams,
    fingerprint: String,
    indicators: IndicatorEngine,
    detector: CycleBottomDetector,
    sizer: Box<dyn PositionSizer>,
    state: StrategyState,
    trace: Vec<BarTrace>,
}

impl fmt::Debug for CycleBottomStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleBottomStrategy")
            .field("params", &self.params)
            .field("sizer", &self.sizer.name())
            .field("state", &self.state)
            .field("bars_seen", &self.indicators.series().len())
            .finish()
    }
}

impl CycleBottomStrategy {
    /// Strategy with the risk-budget sizer built from `params`.
    pub fn new(params: CycleBottomParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let sizer = Box::new(RiskBudgetSizer::from_params(&params));
        Self::with_sizer(params, sizer)
    }

    pub fn with_sizer(
        params: CycleBottomParams,
        sizer: Box<dyn PositionSizer>,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let fingerprint = params.fingerprint();
        info!(
            fingerprint = %fingerprint,
            cycle_length = params.cycle_length,
            envelope_pct = params.envelope_pct,
            confirm_bars = params.confirm_bars,
            sizer = sizer.name(),
            "cycle-bottom strategy initialised"
        );
        Ok(Self {
            indicators: IndicatorEngine::from_params(&params),
            detector: CycleBottomDetector::new(&params),
            sizer,
            state: StrategyState::new(),
            trace: Vec::new(),
            fingerprint,
            params,
        })
    }

    pub fn params(&self) -> &CycleBottomParams {
        &self.params
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn state(&self) -> &StrategyState {
        &self.state
    }

    pub fn series(&self) -> &IndicatorSeries {
        self.indicators.series()
    }

    pub fn detector(&self) -> &CycleBottomDetector {
        &self.detector
    }

    /// Tracked variables for every evaluated bar.
    pub fn trace(&self) -> &[BarTrace] {
        &self.trace
    }

    pub fn trace_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.trace)
    }

    /// Process one bar to completion.
    pub fn on_bar(&mut self, bar: &Bar, broker: &mut dyn Broker) -> BarOutcome {
        if bar.is_void() {
            warn!(bar = bar.index, date = %bar.date, "void bar skipped");
            return BarOutcome::Void;
        }

        self.indicators.update(bar);
        let Some(check) =
            self.detector
                .check(bar, self.indicators.series(), self.state.last_signal_bar())
        else {
            return BarOutcome::Warmup;
        };
        debug!(
            bar = bar.index,
            dipped = check.dipped,
            cross_confirmed = check.cross_confirmed,
            spacing_ok = check.spacing_ok,
            "bottom check"
        );

        let outcome = self.transition(bar, check, broker);
        self.trace.push(BarTrace::capture(
            bar.index,
            bar.date,
            &self.state,
            check.fires(),
        ));
        outcome
    }

    fn transition(&mut self, bar: &Bar, check: BottomCheck, broker: &mut dyn Broker) -> BarOutcome {
        match self.state.phase().clone() {
            Phase::PendingEntry { order, .. } | Phase::PendingExit { order, .. } => {
                BarOutcome::AwaitingOrder(order)
            }
            Phase::Flat if check.fires() => self.enter(bar, broker),
            Phase::Flat => BarOutcome::Hold,
            Phase::Long { stop_loss, .. } => self.manage_long(bar, stop_loss, check, broker),
        }
    }

    fn enter(&mut self, bar: &Bar, broker: &mut dyn Broker) -> BarOutcome {
        let Some(signal) =
            self.detector
                .evaluate(bar, self.indicators.series(), self.state.last_signal_bar())
        else {
            return BarOutcome::Hold;
        };
        let entry_price = signal.close;
        let stop_loss = signal.lower_envelope;
        let cash = broker.cash();

        let size = self.sizer.size(entry_price, stop_loss, cash);
        if size == 0 {
            debug!(
                bar = bar.index,
                entry_price, stop_loss, cash, "bottom signal refused by sizer"
            );
            return BarOutcome::EntryRefused;
        }

        let order = broker.submit_order(OrderSide::Buy, size);
        self.state
            .submit_entry(order, entry_price, stop_loss, size, signal.bar_index);
        info!(
            bar = signal.bar_index,
            date = %signal.date,
            order = %order,
            size,
            entry_price,
            stop_loss,
            low = signal.low,
            "entry order submitted"
        );
        BarOutcome::EntrySubmitted { order, size }
    }

    fn manage_long(
        &mut self,
        bar: &Bar,
        stop_loss: f64,
        check: BottomCheck,
        broker: &mut dyn Broker,
    ) -> BarOutcome {
        let held = broker.position_size();
        if held == 0 {
            warn!(
                bar = bar.index,
                "broker reports no position while long; resetting to flat"
            );
            self.state.close();
            if check.fires() {
                return self.enter(bar, broker);
            }
            return BarOutcome::Reconciled;
        }

        let series = self.indicators.series();
        let crossed_down = series
            .last_pos()
            .and_then(|pos| series.cross_down(pos))
            .is_some_and(|sign| sign > 0.0);

        let reason = if crossed_down {
            ExitReason::CrossDown
        } else if bar.close <= stop_loss {
            ExitReason::StopLoss
        } else {
            return BarOutcome::Hold;
        };

        let order = broker.submit_order(OrderSide::Sell, held);
        self.state.submit_exit(order);
        info!(
            bar = bar.index,
            date = %bar.date,
            order = %order,
            size = held,
            close = bar.close,
            stop_loss,
            ?reason,
            "exit order submitted"
        );
        BarOutcome::ExitSubmitted {
            order,
            size: held,
            reason,
        }
    }

    /// Apply a broker notification about the in-flight order.
    ///
    /// Alive updates are ignored. Updates for any other handle are logged and
    /// dropped.
    pub fn on_order_update(&mut self, update: &OrderUpdate) {
        let Some(pending) = self.state.pending_order() else {
            warn!(order = %update.handle, status = ?update.status, "order update with nothing pending; ignored");
            return;
        };
        if update.handle != pending {
            warn!(
                order = %update.handle,
                pending = %pending,
                status = ?update.status,
                "update for a different order; ignored"
            );
            return;
        }
        if update.status.is_alive() {
            debug!(order = %update.handle, status = ?update.status, "order still working");
            return;
        }

        match self.state.phase().clone() {
            Phase::PendingEntry {
                entry_price,
                stop_loss,
                size,
                ..
            } => self.resolve_entry(update, entry_price, stop_loss, size),
            Phase::PendingExit { size, .. } => self.resolve_exit(update, size),
            Phase::Flat | Phase::Long { .. } => {}
        }
    }

    fn resolve_entry(
        &mut self,
        update: &OrderUpdate,
        provisional_entry: f64,
        provisional_stop: f64,
        ordered: u64,
    ) {
        let filled = match update.status {
            OrderStatus::Completed if update.filled_size == 0 => ordered,
            _ => update.filled_size,
        };
        if filled == 0 {
            warn!(order = %update.handle, status = ?update.status, "entry order not filled; back to flat");
            self.state.abort_entry();
            return;
        }

        let entry_price = update.fill_price.unwrap_or(provisional_entry);
        let stop_loss = self.fill_stop_loss().unwrap_or(provisional_stop);
        self.state.fill_entry(entry_price, stop_loss, filled);
        info!(
            order = %update.handle,
            status = ?update.status,
            entry_price,
            stop_loss,
            size = filled,
            "entry filled"
        );
    }

    fn resolve_exit(&mut self, update: &OrderUpdate, held: u64) {
        let remaining = match update.status {
            OrderStatus::Completed => 0,
            _ => held.saturating_sub(update.filled_size),
        };
        if remaining == 0 {
            self.state.close();
            info!(order = %update.handle, fill_price = ?update.fill_price, "position closed");
        } else {
            warn!(
                order = %update.handle,
                status = ?update.status,
                remaining,
                "exit order not completed; still long"
            );
            self.state.abort_exit(remaining);
        }
    }

    /// Entry-fill stop anchored to the latest evaluated bar, i.e. the bar
    /// before the one the order filled on.
    fn fill_stop_loss(&self) -> Option<f64> {
        let series = self.indicators.series();
        let pos = series.last_pos()?;
        Some(conservative_stop(
            series.low(pos)?,
            series.lower_envelope(pos)?,
        ))
    }
}
