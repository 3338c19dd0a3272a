//! HTTP client layer: `SubgraphHttp` with caller-chosen retry policy.

pub mod client;
pub mod retry;

pub use client::{GraphqlError, GraphqlResponse, SubgraphHttp};
pub use retry::{RetryConfig, RetryPolicy};
