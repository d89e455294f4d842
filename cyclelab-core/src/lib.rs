//! CycleLab Core: a long-only cycle-bottom trading strategy.
//!
//! The strategy enters long when price dips to a lower envelope under a
//! cycle-length moving average after a recent cross-up, sizes the position by
//! a fixed fraction of cash at risk, and exits on a cross-down or a stop-loss.
//!
//! - Domain types (bars, order handles and updates, position side)
//! - Parameters loaded from TOML, validated, fingerprinted
//! - Batch and incremental indicators (SMA, lower envelope, crossovers)
//! - Bottom detector (dip, confirmed cross-up, signal spacing)
//! - Risk-budget position sizer
//! - Trade lifecycle state machine driven bar by bar against a [`broker::Broker`]

pub mod broker;
pub mod config;
pub mod domain;
pub mod indicators;
pub mod lifecycle;
pub mod signal;
pub mod sizers;

pub use broker::Broker;
pub use config::{ConfigError, CycleBottomParams, MinSizePolicy};
pub use lifecycle::{BarOutcome, CycleBottomStrategy, ExitReason};
