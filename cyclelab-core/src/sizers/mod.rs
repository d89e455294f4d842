//! Position sizers: turn an entry price and a stop into an order size.

pub mod risk_budget;

pub use risk_budget::RiskBudgetSizer;

/// Trait for position sizers.
///
/// Sizes are whole units. A size of 0 means "do not trade".
pub trait PositionSizer: Send + Sync {
    /// Human-readable name (e.g., "risk_budget").
    fn name(&self) -> &str;

    /// Size a long entry at `entry_price` protected by `stop_loss`, given the
    /// cash currently available at the broker.
    fn size(&self, entry_price: f64, stop_loss: f64, cash: f64) -> u64;
}
