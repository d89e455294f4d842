//! Broker collaborator interface.
//!
//! The host's order/broker subsystem is passed into every bar evaluation as a
//! context object. Reads are point-in-time snapshots; nothing is reserved or
//! locked. Order outcomes come back later through
//! [`CycleBottomStrategy::on_order_update`](crate::lifecycle::CycleBottomStrategy::on_order_update).

use crate::domain::{OrderHandle, OrderSide};

pub trait Broker {
    /// Cash currently available for new positions.
    fn cash(&self) -> f64;

    /// Units currently held for the traded instrument.
    fn position_size(&self) -> u64;

    /// Submit a market order. Fills are reported asynchronously.
    fn submit_order(&mut self, side: OrderSide, size: u64) -> OrderHandle;
}
