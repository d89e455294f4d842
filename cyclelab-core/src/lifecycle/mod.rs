//! Trade lifecycle: entry and exit orchestration across bars.
//!
//! The only component with cross-bar state. Per bar: indicators update, the
//! detector evaluates, and (when no order is in flight) the strategy either
//! submits an entry, submits an exit, or holds. Order updates arrive between
//! bars and move pending phases to their resolved state.

pub mod manager;
pub mod state;
pub mod trace;

pub use manager::{conservative_stop, BarOutcome, CycleBottomStrategy, ExitReason};
pub use state::{LifecyclePhase, Phase, StrategyState};
pub use trace::BarTrace;
