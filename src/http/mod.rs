//! Retrying, rate-limited text fetcher shared by the KEGG and PubChem clients.

pub mod rate_limit;
pub mod retry;

use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::error::FetchError;

use self::{rate_limit::RateLimiter, retry::RetryPolicy};

/// GET-only HTTP helper applying the retry policy and an optional rate limiter
/// to every attempt.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    limiter: Option<Arc<RateLimiter>>,
}

impl Fetcher {
    pub fn new(
        timeout: Duration,
        policy: RetryPolicy,
        limiter: Option<RateLimiter>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("kegg-harvest/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self {
            client,
            policy,
            limiter: limiter.map(Arc::new),
        })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch `url` as text.
    ///
    /// Any 2xx status is success, including an empty body. `404` is returned
    /// at once as [`FetchError::NotFound`]; other failures are retried until
    /// `max_attempts` requests have been made.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut last = String::new();

        for attempt in 1..=attempts {
            if let Some(limiter) = &self.limiter {
                limiter.acquire().await;
            }

            match self.client.get(url).send().await {
                Ok(resp) if resp.status().is_success() => match resp.text().await {
                    Ok(body) => {
                        debug!(%url, attempt, bytes = body.len(), "fetched");
                        return Ok(body);
                    }
                    Err(err) => {
                        warn!(%url, attempt, attempts, %err, "failed reading body");
                        last = err.to_string();
                    }
                },
                Ok(resp) if resp.status() == StatusCode::NOT_FOUND => {
                    debug!(%url, "not found");
                    return Err(FetchError::NotFound {
                        url: url.to_string(),
                    });
                }
                Ok(resp) => {
                    warn!(%url, attempt, attempts, status = %resp.status(), "request failed");
                    last = format!("status {}", resp.status());
                }
                Err(err) => {
                    warn!(%url, attempt, attempts, %err, "request error");
                    last = err.to_string();
                }
            }

            if attempt < attempts {
                sleep(self.policy.delay(attempt)).await;
            }
        }

        error!(%url, attempts, "giving up");
        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts,
            last,
        })
    }
}

/// Downgrade a fetch failure to "no data", logging what was lost.
pub fn or_empty<T: Default>(result: Result<T, FetchError>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) if err.is_not_found() => {
            debug!(%what, "no data");
            T::default()
        }
        Err(err) => {
            warn!(%what, %err, "treating as no data");
            T::default()
        }
    }
}
