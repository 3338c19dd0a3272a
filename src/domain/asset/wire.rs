//! Wire types for asset queries (subgraph GraphQL).

use crate::shared::serde_util::{decimal, timestamp};
use serde::{Deserialize, Serialize};

/// Token entity fields as the subgraph sends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetWire {
    #[serde(with = "timestamp")]
    pub created_at_timestamp: i64,
    #[serde(with = "decimal")]
    pub market_price: f64,
    #[serde(with = "decimal")]
    pub floor_price: f64,
}

/// `data` payload of [`ASSET_QUERY`]. `token` is null for unknown ids.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetData {
    pub token: Option<AssetWire>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetVariables<'a> {
    pub token: &'a str,
}

pub const ASSET_QUERY: &str = "query Asset($token: ID!) { \
     token(id: $token) { createdAtTimestamp marketPrice floorPrice } }";
