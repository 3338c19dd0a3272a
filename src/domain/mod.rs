//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains (where applicable):
//! - `mod.rs`: Rich domain types (validated, ready to plot)
//! - `wire.rs`: Raw serde structs matching subgraph responses
//! - `convert.rs`: `TryFrom` conversions with validation
//! - `state.rs`: State containers with update methods
//! - `client.rs`: Sub-client with HTTP methods and caching

pub mod asset;
pub mod series;
pub mod timeframe;
