//! Domain types shared by the strategy and its host collaborators.

pub mod bar;
pub mod order;
pub mod position;

pub use bar::Bar;
pub use order::{OrderHandle, OrderSide, OrderStatus, OrderUpdate};
pub use position::PositionSide;
