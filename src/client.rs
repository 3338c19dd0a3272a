//! High-level client: `MiniappClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, and accessor methods.

use crate::domain::asset::client::Assets;
use crate::domain::asset::AssetInfo;
use crate::domain::series::client::SeriesClient;
use crate::domain::series::wire::WireObservation;
use crate::domain::series::{SeriesQuery, SeriesSource, DEFAULT_FETCH_TIMEOUT};
use crate::error::{FetchError, SdkError};
use crate::http::{RetryPolicy, SubgraphHttp};
use crate::shared::TokenId;

use async_lock::RwLock;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Re-export sub-client types for convenience.
pub use crate::domain::asset::client::Assets as AssetsClient;
pub use crate::domain::series::client::SeriesClient as SeriesSubClient;

/// The primary entry point: subgraph-backed data source for the chart.
///
/// Provides nested sub-client accessors for each domain:
/// `client.series()`, `client.assets()`.
#[derive(Clone)]
pub struct MiniappClient {
    pub(crate) http: SubgraphHttp,
    pub(crate) timeout: Duration,
    /// Asset cache: token id → (info, fetched_at). Creation time never
    /// changes, so lookback clamping can reuse it.
    pub(crate) asset_cache: Arc<RwLock<HashMap<TokenId, (AssetInfo, Instant)>>>,
    pub(crate) asset_cache_ttl: Duration,
}

impl MiniappClient {
    pub fn builder() -> MiniappClientBuilder {
        MiniappClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn series(&self) -> SeriesClient<'_> {
        SeriesClient { client: self }
    }

    pub fn assets(&self) -> Assets<'_> {
        Assets { client: self }
    }

    /// Clear all HTTP caches.
    pub async fn clear_all_caches(&self) {
        self.asset_cache.write().await.clear();
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SeriesSource for MiniappClient {
    async fn observations(&self, query: &SeriesQuery) -> Result<Vec<WireObservation>, FetchError> {
        self.http.get_observations(query).await
    }

    async fn asset(&self, token_id: &TokenId) -> Result<AssetInfo, FetchError> {
        self.assets().get(token_id).await
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct MiniappClientBuilder {
    subgraph_url: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
    asset_cache_ttl: Duration,
}

impl Default for MiniappClientBuilder {
    fn default() -> Self {
        Self {
            subgraph_url: crate::network::DEFAULT_SUBGRAPH_URL.to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            retry_policy: RetryPolicy::None,
            asset_cache_ttl: Duration::from_secs(300),
        }
    }
}

impl MiniappClientBuilder {
    pub fn subgraph_url(mut self, url: &str) -> Self {
        self.subgraph_url = url.to_string();
        self
    }

    /// Bounded wait per request (transport and fetcher).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn asset_cache_ttl(mut self, ttl: Duration) -> Self {
        self.asset_cache_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<MiniappClient, SdkError> {
        if self.subgraph_url.trim().is_empty() {
            return Err(SdkError::Validation("subgraph url is empty".to_string()));
        }

        Ok(MiniappClient {
            http: SubgraphHttp::new(&self.subgraph_url, self.timeout, self.retry_policy)?,
            timeout: self.timeout,
            asset_cache: Arc::new(RwLock::new(HashMap::new())),
            asset_cache_ttl: self.asset_cache_ttl,
        })
    }
}
