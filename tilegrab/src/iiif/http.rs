//! HTTP client abstraction for testability

use super::types::FetchError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Trait for asynchronous HTTP client operations.
///
/// One client value is created per run and shared by `Arc` between the
/// manifest walker, the tile-size prober and every tile fetcher. Tests
/// substitute an in-memory implementation.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error. Non-2xx responses are errors.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Default User-Agent string for HTTP requests.
/// Several institutional IIIF servers reject requests without one.
const DEFAULT_USER_AGENT: &str = concat!("tilegrab/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with default configuration.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    ///
    /// The pool keeps enough idle connections per host for the largest
    /// concurrent tile pool so connections are reused between tiles.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .pool_max_idle_per_host(32)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| FetchError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(FetchError::Request(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = url, status = status.as_u16(), "HTTP error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(FetchError::Request(format!("Failed to read response: {}", e)))
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory HTTP client that routes by exact URL and records requests.
    ///
    /// Unknown URLs answer 404.
    #[derive(Default)]
    pub struct MockHttpClient {
        routes: Mutex<HashMap<String, Result<Vec<u8>, FetchError>>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(&self, url: impl Into<String>, body: Vec<u8>) {
            self.routes.lock().unwrap().insert(url.into(), Ok(body));
        }

        pub fn fail(&self, url: impl Into<String>, error: FetchError) {
            self.routes.lock().unwrap().insert(url.into(), Err(error));
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self, url: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.as_str() == url)
                .count()
        }
    }

    impl AsyncHttpClient for MockHttpClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.routes
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .unwrap_or_else(|| {
                    Err(FetchError::Status {
                        status: 404,
                        url: url.to_string(),
                    })
                })
        }
    }

    #[tokio::test]
    async fn test_mock_client_routes() {
        let mock = MockHttpClient::new();
        mock.route("http://example.com/a", vec![1, 2, 3, 4]);

        let result = mock.get("http://example.com/a").await;
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.request_count("http://example.com/a"), 1);
    }

    #[tokio::test]
    async fn test_mock_client_unknown_url_is_404() {
        let mock = MockHttpClient::new();

        let result = mock.get("http://example.com/missing").await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(AsyncReqwestClient::new().is_ok());
    }
}
