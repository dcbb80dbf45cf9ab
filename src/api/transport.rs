//! HTTP transport for the API facade and the image cache.
//!
//! The facade talks to a `Transport` trait object rather than reqwest
//! directly so tests can substitute a counting fake and assert that offline
//! and demo modes never touch the network.
//!
//! A live fetch is cancellable by dropping the task awaiting it; an
//! abandoned request never reaches the cache's store step.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Response header carrying the total object count of a paginated endpoint.
const RESULT_TOTAL_HEADER: &str = "X-Result-Total";

/// Raw response to a GET: body text plus paging metadata when present.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub body: String,
    pub total: Option<usize>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a URL and return the body text. Non-2xx statuses map to
    /// `ApiError` via `ApiError::from_status`.
    async fn get(&self, url: &str) -> Result<ApiResponse, ApiError>;

    /// GET a binary resource (render-service icons and portraits).
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// Production transport.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    /// Send a GET, retrying with exponential backoff while rate limited.
    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self.client.get(url).send().await?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            retries += 1;
            if retries > MAX_RATE_LIMIT_RETRIES {
                return Err(ApiError::RateLimited);
            }
            warn!(url, retry = retries, backoff_ms, "Rate limited, backing off");
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            backoff_ms *= 2;
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<ApiResponse, ApiError> {
        let response = self.get_with_retry(url).await?;
        let status = response.status();

        let total = response
            .headers()
            .get(RESULT_TOTAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }

        Ok(ApiResponse { body, total })
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.get_with_retry(url).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Canned transport for exercising the facade and caches without I/O.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::{ApiResponse, Transport};
    use crate::api::ApiError;

    /// Serves canned bodies by exact URL and counts every call.
    #[derive(Default)]
    pub struct FakeTransport {
        bodies: Mutex<HashMap<String, String>>,
        calls: AtomicUsize,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, url: &str, body: &str) {
            self.bodies
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(url.to_string(), body.to_string());
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn lookup(&self, url: &str) -> Result<String, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.bodies
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(url)
                .cloned()
                .ok_or_else(|| ApiError::from_status(StatusCode::NOT_FOUND, url))
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str) -> Result<ApiResponse, ApiError> {
            let body = self.lookup(url)?;
            Ok(ApiResponse { body, total: None })
        }

        async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
            Ok(self.lookup(url)?.into_bytes())
        }
    }
}
