//! Network utilities for talking to remote comment services.
//!
//! This module provides [`HttpClient`], a thin wrapper over reqwest with the
//! request bounds danmaku providers rely on:
//!
//! - **Timeouts**: 30 s per request, 10 s to establish a connection. The
//!   upstream comment services are known to be slow; these bounds are part
//!   of the client contract, not tuning knobs.
//! - **Retry**: one automatic retry on transport failure, after a fixed
//!   2 s backoff. HTTP error statuses are not retried.
//!
//! Each `HttpClient` owns its own connection pool. A provider holds exactly
//! one client for its lifetime and releases the pool by dropping it; clients
//! are never shared between provider instances.
//!
//! # Examples
//!
//! ```rust,no_run
//! use maku::net::HttpClient;
//!
//! # async fn example() -> maku::Result<()> {
//! let client = HttpClient::new("dandanplay");
//! let body: serde_json::Value = client.get_json("https://api.example.com/v2").await?;
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use reqwest::{Client, header::HeaderMap};
use std::time::Duration;

/// Total time budget for a single request, including the body read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Time budget for establishing the TCP/TLS connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// HTTP client wrapper with fixed-backoff retry for danmaku providers.
///
/// The client is associated with a provider identifier, used for error
/// context and log events. Transport failures (connection refused, reset,
/// timeout) are retried up to `max_retries` times with a fixed backoff
/// between attempts; a response with an error status is returned as
/// [`Error::Source`](crate::Error::Source) without retrying.
///
/// The retry count and backoff are configurable so tests can exercise the
/// policy without real delays; the defaults are the values providers ship
/// with.
///
/// # Examples
///
/// ```rust
/// use maku::net::HttpClient;
/// use std::time::Duration;
///
/// let client = HttpClient::new("dandanplay")
///     .with_header("Accept", "application/json")
///     .with_retry_backoff(Duration::from_millis(100));
/// ```
#[derive(Debug)]
pub struct HttpClient {
    source_id: String,
    client: Client,
    max_retries: u32,
    retry_backoff: Duration,
    headers: HeaderMap,
}

impl HttpClient {
    /// Creates a client for the given provider with the default bounds:
    /// 30 s request timeout, 10 s connect timeout, 1 retry, 2 s backoff.
    pub fn new(source_id: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("maku/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            source_id: source_id.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            headers: HeaderMap::new(),
        }
    }

    /// Sets the maximum number of retries after a transport failure.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the fixed delay between a failure and its retry.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Adds a header sent with every request made by this client.
    ///
    /// Invalid header names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<reqwest::header::HeaderName>(),
            value.parse::<reqwest::header::HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Performs a GET request, retrying transport failures.
    ///
    /// Returns the response body as [`Bytes`] on success.
    ///
    /// # Errors
    ///
    /// * [`Error::Source`](crate::Error::Source) - non-success HTTP status
    /// * [`Error::Network`](crate::Error::Network) - transport failure after
    ///   the retry budget is spent
    pub async fn get(&self, url: &str) -> crate::Result<Bytes> {
        let mut attempts = 0;

        loop {
            match self
                .client
                .get(url)
                .headers(self.headers.clone())
                .send()
                .await
            {
                Ok(response) => {
                    if response.status().is_success() {
                        return Ok(response.bytes().await?);
                    }

                    return Err(crate::Error::source(
                        &self.source_id,
                        format!("HTTP {}", response.status()),
                    ));
                }
                Err(e) => {
                    if attempts < self.max_retries {
                        attempts += 1;
                        tracing::debug!(
                            source = %self.source_id,
                            attempt = attempts,
                            error = %e,
                            "request failed, retrying after backoff"
                        );
                        tokio::time::sleep(self.retry_backoff).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Performs a GET request and deserializes the response as JSON.
    ///
    /// # Errors
    ///
    /// * All errors from [`get()`](HttpClient::get)
    /// * [`Error::Json`](crate::Error::Json) - if JSON parsing fails
    pub async fn get_json<T>(&self, url: &str) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = self.get(url).await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}
