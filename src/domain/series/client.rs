//! Series sub-client: timeframe-aware price history queries.

use crate::client::MiniappClient;
use crate::domain::series::{FetchedSeries, SeriesFetcher};
use crate::domain::timeframe::{QueryPlan, Timeframe};
use crate::error::FetchError;
use crate::shared::{Clock, SystemClock, TokenId};

/// Sub-client for series operations.
pub struct SeriesClient<'a> {
    pub(crate) client: &'a MiniappClient,
}

impl<'a> SeriesClient<'a> {
    /// Fetch the series for `timeframe`, with the lookback clamped to the
    /// token's creation time.
    pub async fn get(
        &self,
        token_id: &TokenId,
        timeframe: Timeframe,
    ) -> Result<(QueryPlan, FetchedSeries), FetchError> {
        self.get_at(token_id, timeframe, &SystemClock).await
    }

    /// Same as [`get`](Self::get) with an explicit clock.
    pub async fn get_at(
        &self,
        token_id: &TokenId,
        timeframe: Timeframe,
        clock: &impl Clock,
    ) -> Result<(QueryPlan, FetchedSeries), FetchError> {
        self.fetcher()
            .resolve_and_fetch(token_id, timeframe, clock.now())
            .await
    }

    /// A fetcher over this client, for callers driving their own plans.
    pub fn fetcher(&self) -> SeriesFetcher<MiniappClient> {
        SeriesFetcher::new(self.client.clone()).with_timeout(self.client.timeout)
    }
}
