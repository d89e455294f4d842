use serde::{Deserialize, Serialize};

/// Exposure held by the strategy. The cycle-bottom strategy is long-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionSide {
    #[default]
    Flat,
    Long,
}
