//! Shared fixtures for integration tests: a recording broker and bar builders.

#![allow(dead_code)]

use chrono::NaiveDate;
use cyclelab_core::domain::{Bar, OrderHandle, OrderSide, OrderStatus, OrderUpdate};
use cyclelab_core::Broker;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmittedOrder {
    pub handle: OrderHandle,
    pub side: OrderSide,
    pub size: u64,
}

/// In-memory broker. Fills happen only when a test calls [`MockBroker::fill`].
///
/// Panics if the strategy submits while another order is outstanding.
#[derive(Debug)]
pub struct MockBroker {
    pub cash: f64,
    pub position: u64,
    next_id: u64,
    pub submitted: Vec<SubmittedOrder>,
    outstanding: Option<SubmittedOrder>,
}

impl MockBroker {
    pub fn new(cash: f64) -> Self {
        Self {
            cash,
            position: 0,
            next_id: 0,
            submitted: Vec::new(),
            outstanding: None,
        }
    }

    pub fn outstanding(&self) -> Option<SubmittedOrder> {
        self.outstanding
    }

    pub fn last_submitted(&self) -> Option<SubmittedOrder> {
        self.submitted.last().copied()
    }

    /// Execute the outstanding order in full at `price`.
    pub fn fill(&mut self, handle: OrderHandle, price: f64) -> OrderUpdate {
        let order = self.take(handle);
        let notional = price * order.size as f64;
        match order.side {
            OrderSide::Buy => {
                self.cash -= notional;
                self.position += order.size;
            }
            OrderSide::Sell => {
                self.cash += notional;
                self.position -= order.size;
            }
        }
        OrderUpdate::completed(handle, price, order.size)
    }

    /// Execute part of the order, then cancel the rest.
    pub fn partial_cancel(&mut self, handle: OrderHandle, price: f64, filled: u64) -> OrderUpdate {
        let order = self.take(handle);
        assert!(filled < order.size, "partial fill must leave a remainder");
        let notional = price * filled as f64;
        match order.side {
            OrderSide::Buy => {
                self.cash -= notional;
                self.position += filled;
            }
            OrderSide::Sell => {
                self.cash += notional;
                self.position -= filled;
            }
        }
        OrderUpdate {
            handle,
            status: OrderStatus::Cancelled,
            fill_price: Some(price),
            filled_size: filled,
        }
    }

    pub fn reject(&mut self, handle: OrderHandle) -> OrderUpdate {
        self.take(handle);
        OrderUpdate::rejected(handle)
    }

    fn take(&mut self, handle: OrderHandle) -> SubmittedOrder {
        match self.outstanding.take() {
            Some(order) if order.handle == handle => order,
            other => panic!("order {handle} is not outstanding (outstanding: {other:?})"),
        }
    }
}

impl Broker for MockBroker {
    fn cash(&self) -> f64 {
        self.cash
    }

    fn position_size(&self) -> u64 {
        self.position
    }

    fn submit_order(&mut self, side: OrderSide, size: u64) -> OrderHandle {
        assert!(
            self.outstanding.is_none(),
            "second order submitted while {:?} is outstanding",
            self.outstanding
        );
        assert!(size > 0, "zero-size order submitted");
        self.next_id += 1;
        let order = SubmittedOrder {
            handle: OrderHandle(self.next_id),
            side,
            size,
        };
        self.submitted.push(order);
        self.outstanding = Some(order);
        order.handle
    }
}

pub fn date(index: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Duration::days(index as i64)
}

/// Bar opening at its close, with the given low.
pub fn bar(index: u64, close: f64, low: f64) -> Bar {
    Bar::new(index, date(index), close, close + 1.0, low, close)
}

/// Flat tape at 100 (P=40) with a cross-up on bar 49 and a bottom on bar 50.
///
/// Bar 50: close 99, low 97.8, average 100, envelope 98.
pub fn bottom_at_50() -> Vec<Bar> {
    let mut bars: Vec<Bar> = (0..49).map(|i| bar(i, 100.0, 99.5)).collect();
    bars.push(bar(49, 101.0, 100.5));
    bars.push(bar(50, 99.0, 97.8));
    bars
}
