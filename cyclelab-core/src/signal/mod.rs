//! Entry signal detection.
//!
//! The detector is a pure predicate: given the latest bar, the indicator series
//! that already include it, and the bar index of the previous entry signal, it
//! decides whether a cycle bottom fires. It never sees broker or position state.

pub mod cycle_bottom;

pub use cycle_bottom::{BottomCheck, BottomSignal, CycleBottomDetector, DIP_TOLERANCE};
