//! Strategy state machine.
//!
//! ```text
//!            signal + size > 0                 buy completed
//!   Flat ─────────────────────────► PendingEntry ─────────────► Long
//!    ▲                                   │                       │
//!    │         buy rejected/cancelled    │                       │ cross-down or stop
//!    ◄───────────────────────────────────┘                       ▼
//!    │                 sell completed                       PendingExit
//!    ◄──────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected or cancelled sell returns `PendingExit` to `Long`. Entry and stop
//! prices live inside the phases that need them, so they are undefined by
//! construction whenever the strategy is flat.

use serde::{Deserialize, Serialize};

use crate::domain::{OrderHandle, PositionSide};

/// Tag of the current phase, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecyclePhase {
    Flat,
    PendingEntry,
    Long,
    PendingExit,
}

impl LifecyclePhase {
    /// Phases reachable in one step, including staying put.
    pub fn can_transition_to(&self, next: LifecyclePhase) -> bool {
        use LifecyclePhase::*;
        match self {
            Flat => matches!(next, Flat | PendingEntry),
            PendingEntry => matches!(next, PendingEntry | Long | Flat),
            // Long -> Flat only when the broker reports the position gone.
            Long => matches!(next, Long | PendingExit | Flat),
            PendingExit => matches!(next, PendingExit | Flat | Long),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Flat,
    /// Buy submitted. Prices are provisional: signal-bar close and envelope.
    PendingEntry {
        order: OrderHandle,
        entry_price: f64,
        stop_loss: f64,
        size: u64,
    },
    Long {
        entry_price: f64,
        stop_loss: f64,
        size: u64,
    },
    PendingExit {
        order: OrderHandle,
        entry_price: f64,
        stop_loss: f64,
        size: u64,
    },
}

/// Mutable state of one strategy run.
#[derive(Debug, Clone)]
pub struct StrategyState {
    phase: Phase,
    last_signal_bar: Option<u64>,
}

impl Default for StrategyState {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Flat,
            last_signal_bar: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn kind(&self) -> LifecyclePhase {
        match self.phase {
            Phase::Flat => LifecyclePhase::Flat,
            Phase::PendingEntry { .. } => LifecyclePhase::PendingEntry,
            Phase::Long { .. } => LifecyclePhase::Long,
            Phase::PendingExit { .. } => LifecyclePhase::PendingExit,
        }
    }

    pub fn position(&self) -> PositionSide {
        match self.phase {
            Phase::Flat | Phase::PendingEntry { .. } => PositionSide::Flat,
            Phase::Long { .. } | Phase::PendingExit { .. } => PositionSide::Long,
        }
    }

    pub fn pending_order(&self) -> Option<OrderHandle> {
        match self.phase {
            Phase::PendingEntry { order, .. } | Phase::PendingExit { order, .. } => Some(order),
            Phase::Flat | Phase::Long { .. } => None,
        }
    }

    pub fn has_pending_order(&self) -> bool {
        self.pending_order().is_some()
    }

    /// Bar index of the most recent submitted entry.
    pub fn last_signal_bar(&self) -> Option<u64> {
        self.last_signal_bar
    }

    pub fn entry_price(&self) -> Option<f64> {
        match self.phase {
            Phase::Flat => None,
            Phase::PendingEntry { entry_price, .. }
            | Phase::Long { entry_price, .. }
            | Phase::PendingExit { entry_price, .. } => Some(entry_price),
        }
    }

    pub fn stop_loss_price(&self) -> Option<f64> {
        match self.phase {
            Phase::Flat => None,
            Phase::PendingEntry { stop_loss, .. }
            | Phase::Long { stop_loss, .. }
            | Phase::PendingExit { stop_loss, .. } => Some(stop_loss),
        }
    }

    /// Size held (or provisionally ordered while an entry is pending).
    pub fn size(&self) -> Option<u64> {
        match self.phase {
            Phase::Flat => None,
            Phase::PendingEntry { size, .. }
            | Phase::Long { size, .. }
            | Phase::PendingExit { size, .. } => Some(size),
        }
    }

    // ── Transitions ──────────────────────────────────────────────────
    //
    // Each returns false and leaves the state untouched when called from the
    // wrong phase.

    /// Flat → PendingEntry. Records the signal bar for spacing.
    pub(crate) fn submit_entry(
        &mut self,
        order: OrderHandle,
        entry_price: f64,
        stop_loss: f64,
        size: u64,
        bar_index: u64,
    ) -> bool {
        if !matches!(self.phase, Phase::Flat) {
            return false;
        }
        self.phase = Phase::PendingEntry {
            order,
            entry_price,
            stop_loss,
            size,
        };
        self.last_signal_bar = Some(bar_index);
        true
    }

    /// PendingEntry → Long with the final entry and stop prices.
    pub(crate) fn fill_entry(&mut self, entry_price: f64, stop_loss: f64, size: u64) -> bool {
        if !matches!(self.phase, Phase::PendingEntry { .. }) {
            return false;
        }
        self.phase = Phase::Long {
            entry_price,
            stop_loss,
            size,
        };
        true
    }

    /// PendingEntry → Flat. `last_signal_bar` is kept.
    pub(crate) fn abort_entry(&mut self) -> bool {
        if !matches!(self.phase, Phase::PendingEntry { .. }) {
            return false;
        }
        self.phase = Phase::Flat;
        true
    }

    /// Long → PendingExit.
    pub(crate) fn submit_exit(&mut self, order: OrderHandle) -> bool {
        match self.phase {
            Phase::Long {
                entry_price,
                stop_loss,
                size,
            } => {
                self.phase = Phase::PendingExit {
                    order,
                    entry_price,
                    stop_loss,
                    size,
                };
                true
            }
            _ => false,
        }
    }

    /// PendingExit → Long with whatever size is still held.
    pub(crate) fn abort_exit(&mut self, remaining: u64) -> bool {
        match self.phase {
            Phase::PendingExit {
                entry_price,
                stop_loss,
                ..
            } => {
                self.phase = Phase::Long {
                    entry_price,
                    stop_loss,
                    size: remaining,
                };
                true
            }
            _ => false,
        }
    }

    /// PendingExit → Flat, or Long → Flat when the broker reports no position.
    pub(crate) fn close(&mut self) -> bool {
        if !matches!(self.phase, Phase::PendingExit { .. } | Phase::Long { .. }) {
            return false;
        }
        self.phase = Phase::Flat;
        true
    }
}
