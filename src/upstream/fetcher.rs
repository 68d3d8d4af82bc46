//! Upstream GET with a bounded total timeout.
//!
//! # Responsibilities
//! - Fetch one URL and buffer its body
//! - Fetch a URL list in order, stopping at the first failure
//! - Describe failures with the URL that caused them
//!
//! # Design Decisions
//! - Status codes are not interpreted; a readable 5xx body is data
//! - No retries: every upstream gets exactly one attempt
//! - The client timeout covers connect, headers and body together

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use thiserror::Error;
use url::Url;

use crate::observability::metrics;

/// Failure to fetch a single upstream.
///
/// The `Display` text is returned to the client as-is.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("getting {url} error: invalid URL: {cause}")]
    InvalidUrl { url: String, cause: url::ParseError },

    #[error("getting {url} error: {cause}")]
    Request { url: String, cause: String },

    #[error("reading {url} response body error: {cause}")]
    Read { url: String, cause: String },

    #[error("building upstream client error: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// The upstream URL this error refers to, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::InvalidUrl { url, .. }
            | FetchError::Request { url, .. }
            | FetchError::Read { url, .. } => Some(url),
            FetchError::Client(_) => None,
        }
    }
}

/// Issues upstream GETs for a single inbound request.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    /// Build a fresh client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, timeout })
    }

    /// GET `raw_url` and return the full response body.
    pub async fn fetch(&self, raw_url: &str) -> Result<Bytes, FetchError> {
        let start = Instant::now();
        let result = self.fetch_inner(raw_url).await;

        match &result {
            Ok(body) => {
                tracing::debug!(url = %raw_url, bytes = body.len(), elapsed = ?start.elapsed(), "Upstream fetched");
                metrics::record_upstream_fetch("ok", start);
            }
            Err(e) => {
                tracing::warn!(url = %raw_url, error = %e, "Upstream fetch failed");
                let outcome = match e {
                    FetchError::InvalidUrl { .. } => "invalid_url",
                    FetchError::Read { .. } => "read_error",
                    _ => "request_error",
                };
                metrics::record_upstream_fetch(outcome, start);
            }
        }

        result
    }

    async fn fetch_inner(&self, raw_url: &str) -> Result<Bytes, FetchError> {
        let url = Url::parse(raw_url).map_err(|cause| FetchError::InvalidUrl {
            url: raw_url.to_string(),
            cause,
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: raw_url.to_string(),
                cause: self.describe(&e),
            })?;

        tracing::trace!(url = %raw_url, status = %response.status(), "Upstream responded");

        response.bytes().await.map_err(|e| FetchError::Read {
            url: raw_url.to_string(),
            cause: self.describe(&e),
        })
    }

    /// Fetch every URL, returning bodies in input order.
    ///
    /// At most `parallelism` fetches are in flight; 1 fetches strictly one
    /// after another. Results are consumed in list order, so the error
    /// returned is always the one for the lowest failing index, and any
    /// fetches still running when it surfaces are dropped.
    pub async fn fetch_all(
        &self,
        urls: &[String],
        parallelism: usize,
    ) -> Result<Vec<Bytes>, FetchError> {
        stream::iter(urls.iter().cloned())
            .map(|url| async move { self.fetch(&url).await })
            .buffered(parallelism.max(1))
            .try_collect()
            .await
    }

    fn describe(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            return format!("timed out after {:?}", self.timeout);
        }

        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
