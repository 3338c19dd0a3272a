//! Series fetcher: resolves a query plan against a data source.
//!
//! The fetcher applies a bounded wait to every request and normalizes what
//! comes back. It never retries: retry policy belongs to the caller (or to
//! the transport it configured).

use super::convert::normalize;
use super::wire::WireObservation;
use super::FetchedSeries;
use crate::domain::asset::AssetInfo;
use crate::domain::timeframe::{self, QueryPlan, Timeframe};
use crate::error::FetchError;
use crate::shared::timeout::timeout;
use crate::shared::{Granularity, TokenId};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Bounded wait applied to each data-source request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One request against the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesQuery {
    pub token_id: TokenId,
    /// Unix seconds, inclusive.
    pub since: i64,
    pub granularity: Granularity,
    pub max_points: u32,
}

/// External provider of indexed observations (a subgraph in production).
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SeriesSource {
    /// Up to `query.max_points` buckets at `query.granularity` since
    /// `query.since`, in any order.
    async fn observations(&self, query: &SeriesQuery) -> Result<Vec<WireObservation>, FetchError>;

    /// Creation time and current prices of a token.
    async fn asset(&self, token_id: &TokenId) -> Result<AssetInfo, FetchError>;
}

/// Retrieves and normalizes series for resolved query plans.
pub struct SeriesFetcher<S> {
    source: S,
    timeout: Duration,
}

impl<S: SeriesSource> SeriesFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the series described by `plan`.
    ///
    /// When the preferred granularity yields nothing and the plan names a
    /// fallback (LIVE → hourly), the fallback is queried once. Empty or
    /// degenerate results come back as [`FetchedSeries::Flat`].
    pub async fn fetch(
        &self,
        token_id: &TokenId,
        plan: &QueryPlan,
    ) -> Result<FetchedSeries, FetchError> {
        let mut query = SeriesQuery {
            token_id: token_id.clone(),
            since: plan.effective_since,
            granularity: plan.granularity,
            max_points: plan.max_points,
        };

        let mut raw = self.bounded(self.source.observations(&query)).await?;

        if raw.is_empty() {
            if let Some(fallback) = plan.fallback_granularity {
                tracing::debug!(
                    token = %token_id,
                    from = %query.granularity,
                    to = %fallback,
                    "No buckets at preferred granularity, querying fallback"
                );
                query.granularity = fallback;
                raw = self.bounded(self.source.observations(&query)).await?;
            }
        }

        let series =
            normalize(raw, plan.max_points).map_err(|e| FetchError::Decode(e.to_string()))?;
        let fetched = FetchedSeries::classify(series);

        tracing::debug!(
            token = %token_id,
            timeframe = %plan.timeframe,
            granularity = %query.granularity,
            points = fetched.series().len(),
            flat = fetched.is_flat(),
            "Fetched series"
        );

        Ok(fetched)
    }

    /// Asset info, under the same bounded wait.
    pub async fn asset(&self, token_id: &TokenId) -> Result<AssetInfo, FetchError> {
        self.bounded(self.source.asset(token_id)).await
    }

    /// Look up the asset's creation time, resolve `timeframe` against it and
    /// fetch.
    pub async fn resolve_and_fetch(
        &self,
        token_id: &TokenId,
        timeframe: Timeframe,
        now: i64,
    ) -> Result<(QueryPlan, FetchedSeries), FetchError> {
        let asset = self.asset(token_id).await?;
        let plan = timeframe::resolve(timeframe, asset.created_at, now);
        let fetched = self.fetch(token_id, &plan).await?;
        Ok((plan, fetched))
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        timeout(self.timeout, fut).await.map_err(|elapsed| {
            tracing::debug!("Data source request timed out: {}", elapsed);
            FetchError::Timeout
        })?
    }
}
