//! Assets sub-client: token creation time and current prices, cached.

use crate::client::MiniappClient;
use crate::domain::asset::AssetInfo;
use crate::error::FetchError;
use crate::shared::timeout::timeout;
use crate::shared::TokenId;
use std::time::Instant;

/// Sub-client for asset lookups.
pub struct Assets<'a> {
    pub(crate) client: &'a MiniappClient,
}

impl<'a> Assets<'a> {
    /// Get asset info. Uses TTL cache.
    pub async fn get(&self, token_id: &TokenId) -> Result<AssetInfo, FetchError> {
        {
            let cache = self.client.asset_cache.read().await;
            if let Some((info, fetched_at)) = cache.get(token_id) {
                if fetched_at.elapsed() < self.client.asset_cache_ttl {
                    return Ok(info.clone());
                }
            }
        }

        let wire = timeout(self.client.timeout, self.client.http.get_asset(token_id))
            .await
            .map_err(|_| FetchError::Timeout)??;
        let info = AssetInfo::from_wire(token_id.clone(), wire);

        self.client
            .asset_cache
            .write()
            .await
            .insert(token_id.clone(), (info.clone(), Instant::now()));

        Ok(info)
    }

    /// Drop a cached entry so the next `get` refetches current prices.
    pub async fn invalidate(&self, token_id: &TokenId) {
        self.client.asset_cache.write().await.remove(token_id);
    }
}
