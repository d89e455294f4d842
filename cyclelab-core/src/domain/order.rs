//! Order requests and the status updates the broker reports back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier the broker assigns to a submitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderHandle(pub u64);

impl fmt::Display for OrderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Order lifecycle as reported by the broker.
///
/// `Submitted`, `Accepted` and `PartiallyFilled` are alive: the order may still
/// execute. Every other status is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Submitted,
    Accepted,
    PartiallyFilled,
    Completed,
    Cancelled,
    Expired,
    Rejected,
}

impl OrderStatus {
    pub fn is_alive(&self) -> bool {
        matches!(
            self,
            Self::Submitted | Self::Accepted | Self::PartiallyFilled
        )
    }
}

/// Asynchronous notification about a previously submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub handle: OrderHandle,
    pub status: OrderStatus,
    /// Average execution price, if anything executed.
    pub fill_price: Option<f64>,
    /// Cumulative executed size.
    pub filled_size: u64,
}

impl OrderUpdate {
    pub fn completed(handle: OrderHandle, fill_price: f64, filled_size: u64) -> Self {
        Self {
            handle,
            status: OrderStatus::Completed,
            fill_price: Some(fill_price),
            filled_size,
        }
    }

    pub fn rejected(handle: OrderHandle) -> Self {
        Self {
            handle,
            status: OrderStatus::Rejected,
            fill_price: None,
            filled_size: 0,
        }
    }

    pub fn cancelled(handle: OrderHandle) -> Self {
        Self {
            handle,
            status: OrderStatus::Cancelled,
            fill_price: None,
            filled_size: 0,
        }
    }
}
