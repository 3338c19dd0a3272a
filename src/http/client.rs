//! Low-level HTTP client: `SubgraphHttp`.
//!
//! Posts GraphQL documents to the subgraph endpoint and unwraps the
//! `{ data, errors }` envelope. Returns wire types; conversion to domain
//! types happens in the domain slices.

use crate::domain::asset::wire::{AssetData, AssetVariables, ASSET_QUERY};
use crate::domain::series::wire::{
    observations_query, ObservationsData, ObservationsVariables, WireObservation,
};
use crate::domain::series::SeriesQuery;
use crate::error::FetchError;
use crate::http::retry::RetryPolicy;
use crate::shared::TokenId;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

impl<T: DeserializeOwned> GraphqlResponse<T> {
    /// Parse a response body and unwrap it. Malformed bodies, including
    /// buckets missing a required field, are decode errors.
    pub fn decode(body: &str) -> Result<T, FetchError> {
        serde_json::from_str::<Self>(body)
            .map_err(|e| FetchError::Decode(e.to_string()))?
            .into_result()
    }
}

impl<T> GraphqlResponse<T> {
    /// `errors` wins over partial `data`.
    pub fn into_result(self) -> Result<T, FetchError> {
        if !self.errors.is_empty() {
            return Err(FetchError::Graphql(
                self.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        self.data
            .ok_or_else(|| FetchError::Decode("GraphQL response without data".to_string()))
    }
}

#[derive(Serialize)]
struct GraphqlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

/// Low-level HTTP client for the subgraph GraphQL endpoint.
#[derive(Clone)]
pub struct SubgraphHttp {
    url: String,
    client: Client,
    retry: RetryPolicy,
}

impl SubgraphHttp {
    pub fn new(url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(timeout).pool_max_idle_per_host(4);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            retry,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub async fn get_observations(
        &self,
        query: &SeriesQuery,
    ) -> Result<Vec<WireObservation>, FetchError> {
        let document = observations_query(query.granularity);
        let variables = ObservationsVariables {
            token: query.token_id.as_str(),
            since: query.since,
            first: query.max_points,
        };
        let data: ObservationsData = self.query(&document, variables).await?;
        Ok(data.buckets)
    }

    pub async fn get_asset(
        &self,
        token_id: &TokenId,
    ) -> Result<crate::domain::asset::wire::AssetWire, FetchError> {
        let variables = AssetVariables {
            token: token_id.as_str(),
        };
        let data: AssetData = self.query(ASSET_QUERY, variables).await?;
        data.token
            .ok_or_else(|| FetchError::NotFound(format!("Token not indexed: {}", token_id)))
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn query<T: DeserializeOwned, V: Serialize>(
        &self,
        document: &str,
        variables: V,
    ) -> Result<T, FetchError> {
        let body = GraphqlRequest {
            query: document,
            variables,
        };

        let Some(config) = self.retry.config() else {
            return self.do_request(&body).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T, _>(&body).await {
                Ok(resp) => return Ok(resp),
                Err(e) if config.should_retry(&e) && attempt < config.max_retries => {
                    let retry_after = match &e {
                        FetchError::RateLimited { retry_after_ms } => {
                            retry_after_ms.map(Duration::from_millis)
                        }
                        _ => None,
                    };
                    let delay = config.delay_for_attempt(attempt, retry_after);
                    tracing::debug!(
                        attempt = attempt + 1,
                        max = config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying subgraph query: {}",
                        e
                    );
                    futures_timer::Delay::new(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(FetchError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned, B: Serialize>(
        &self,
        body: &B,
    ) -> Result<T, FetchError> {
        let resp = self.client.post(&self.url).json(body).send().await?;
        let status = resp.status();

        if status.is_success() {
            let body = resp.text().await?;
            return GraphqlResponse::decode(&body);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs * 1_000);
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            404 => Err(FetchError::NotFound(body_text)),
            429 => Err(FetchError::RateLimited { retry_after_ms }),
            400..=499 => Err(FetchError::BadRequest(body_text)),
            _ => Err(FetchError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_errors_win() {
        let json = r#"{"data":{"buckets":[]},"errors":[{"message":"indexing error"}]}"#;
        let resp: GraphqlResponse<ObservationsData> = serde_json::from_str(json).unwrap();
        match resp.into_result() {
            Err(FetchError::Graphql(msgs)) => assert_eq!(msgs, ["indexing error"]),
            other => panic!("expected Graphql error, got {:?}", other.map(|d| d.buckets.len())),
        }
    }

    #[test]
    fn test_envelope_missing_data_is_decode_error() {
        let resp: GraphqlResponse<ObservationsData> = serde_json::from_str("{}").unwrap();
        assert!(matches!(resp.into_result(), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_envelope_buckets() {
        let json = r#"{"data":{"buckets":[
            {"timestamp":"60","marketPrice":"1.0","floorPrice":"0.5","volume":"3"}
        ]}}"#;
        let resp: GraphqlResponse<ObservationsData> = serde_json::from_str(json).unwrap();
        let data = resp.into_result().unwrap();
        assert_eq!(data.buckets.len(), 1);
        assert_eq!(data.buckets[0].volume, 3.0);
    }

    #[test]
    fn test_bucket_without_volume_is_decode_error() {
        let json = r#"{"data":{"buckets":[
            {"timestamp":"60","marketPrice":"1.0","floorPrice":"0.5"},
            {"timestamp":"120","marketPrice":"2.0","floorPrice":"0.5"}
        ]}}"#;
        let err = GraphqlResponse::<ObservationsData>::decode(json).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "{:?}", err);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let http = SubgraphHttp::new(
            "http://localhost:8000/subgraphs/name/x/",
            Duration::from_secs(1),
            RetryPolicy::None,
        )
        .unwrap();
        assert_eq!(http.url(), "http://localhost:8000/subgraphs/name/x");
    }
}
