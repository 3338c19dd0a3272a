//! Network URL constants for the miniapp chart client.

/// Default subgraph GraphQL endpoint (a local graph-node deployment).
pub const DEFAULT_SUBGRAPH_URL: &str = "http://localhost:8000/subgraphs/name/miniapp";
