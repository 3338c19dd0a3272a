//! Asset domain: creation time and current prices of a board token.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use crate::shared::TokenId;
use serde::{Deserialize, Serialize};

/// What the chart needs to know about a token besides its price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub token_id: TokenId,
    /// Unix seconds. Lower bound for every lookback window.
    pub created_at: i64,
    pub current_market_price: f64,
    pub current_floor_price: f64,
}

impl AssetInfo {
    pub(crate) fn from_wire(token_id: TokenId, w: wire::AssetWire) -> Self {
        Self {
            token_id,
            created_at: w.created_at_timestamp,
            current_market_price: w.market_price,
            current_floor_price: w.floor_price,
        }
    }
}
