//! Retry policies for subgraph queries.

use crate::error::FetchError;
use std::time::Duration;

/// Retry policy for subgraph queries.
///
/// The series fetcher never retries on its own; whoever builds the client
/// picks the policy here.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// No retries. A failed query surfaces immediately.
    #[default]
    None,
    /// Retry transport failures, timeouts and 429/502/503/504 with backoff.
    /// Queries are read-only, so this is always safe.
    Idempotent,
    /// User-provided retry logic.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// The config to run with, or `None` for a single attempt.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(c) => Some(c.clone()),
        }
    }
}

/// Backoff parameters.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// ±25% random spread on each delay.
    pub jitter: bool,
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    pub fn idempotent() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    /// Whether `error` is worth another attempt under this config.
    pub fn should_retry(&self, error: &FetchError) -> bool {
        match error {
            FetchError::ServerError { status, .. } => self.retryable_statuses.contains(status),
            FetchError::RateLimited { .. } => self.retryable_statuses.contains(&429),
            FetchError::Timeout => true,
            #[cfg(feature = "http")]
            FetchError::Reqwest(re) => {
                #[cfg(not(target_arch = "wasm32"))]
                let retryable = re.is_connect() || re.is_timeout() || re.is_request();
                #[cfg(target_arch = "wasm32")]
                let retryable = re.is_timeout() || re.is_request();
                retryable
            }
            // GraphQL validation/decode failures repeat identically.
            _ => false,
        }
    }

    /// Delay before retry number `attempt` (0-indexed). A server-provided
    /// `Retry-After` overrides the backoff, still capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let max_ms = self.max_delay.as_millis() as f64;

        if let Some(after) = retry_after {
            return Duration::from_millis((after.as_millis() as f64).min(max_ms) as u64);
        }

        let base = self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(max_ms);

        let final_ms = if self.jitter {
            let spread = capped * 0.25;
            (capped + (rand::random::<f64>() - 0.5) * 2.0 * spread).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(initial_ms: u64, max_ms: u64, factor: f64) -> RetryConfig {
        RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
            backoff_factor: factor,
            jitter: false,
            retryable_statuses: vec![502, 503],
        }
    }

    #[test]
    fn test_default_policy_never_retries() {
        assert!(RetryPolicy::default().config().is_none());
        assert!(RetryPolicy::Idempotent.config().is_some());
    }

    #[test]
    fn test_exponential_backoff() {
        let config = fixed(100, 10_000, 2.0);
        let delays: Vec<_> = (0..3)
            .map(|a| config.delay_for_attempt(a, None).as_millis())
            .collect();
        assert_eq!(delays, [100, 200, 400]);
    }

    #[test]
    fn test_backoff_capped_and_retry_after_honored() {
        let config = fixed(1_000, 2_000, 10.0);
        assert_eq!(config.delay_for_attempt(3, None).as_millis(), 2_000);
        assert_eq!(
            config
                .delay_for_attempt(0, Some(Duration::from_millis(700)))
                .as_millis(),
            700
        );
        assert_eq!(
            config
                .delay_for_attempt(0, Some(Duration::from_secs(60)))
                .as_millis(),
            2_000
        );
    }

    #[test]
    fn test_jitter_stays_within_spread() {
        let config = RetryConfig {
            jitter: true,
            ..fixed(400, 10_000, 1.0)
        };
        for _ in 0..50 {
            let ms = config.delay_for_attempt(0, None).as_millis();
            assert!((300..=500).contains(&ms), "delay {} out of range", ms);
        }
    }

    #[test]
    fn test_retry_classification() {
        let config = fixed(1, 1, 1.0);
        assert!(config.should_retry(&FetchError::Timeout));
        assert!(config.should_retry(&FetchError::ServerError {
            status: 503,
            body: String::new()
        }));
        assert!(!config.should_retry(&FetchError::ServerError {
            status: 500,
            body: String::new()
        }));
        assert!(!config.should_retry(&FetchError::RateLimited {
            retry_after_ms: None
        }));
        assert!(!config.should_retry(&FetchError::Graphql(vec!["bad".into()])));
        assert!(RetryConfig::idempotent().should_retry(&FetchError::RateLimited {
            retry_after_ms: Some(10)
        }));
    }
}
