//! The aggregation handler.
//!
//! # Data Flow
//! ```text
//! method policy → read body (size + time bounded) → parse URL list
//!     → check URL count → fetch all (fail-fast, ordered)
//!     → assemble entries → serialize → 200
//! ```
//!
//! A request is all-or-nothing: the first upstream failure discards every
//! body already fetched and only the error text is returned.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::{GatewayConfig, MethodPolicy};
use crate::http::error::{BadRequest, RequestError};
use crate::http::request::{RequestIdExt, UrlList};
use crate::http::response::assemble;
use crate::observability::metrics;
use crate::upstream::Fetcher;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Entry point for every path and method.
pub async fn aggregate_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers.request_id().to_string();

    if method != Method::POST {
        match state.config.request.method_policy {
            MethodPolicy::Reject => {
                tracing::warn!(request_id = %request_id, method = %method, "Method not allowed");
                metrics::record_request(method.as_str(), 405, start_time);
                return (
                    StatusCode::METHOD_NOT_ALLOWED,
                    [(header::ALLOW, HeaderValue::from_static("POST"))],
                    "Method not allowed",
                )
                    .into_response();
            }
            MethodPolicy::Permissive => {
                tracing::warn!(request_id = %request_id, method = %method, "Non-POST request, processing anyway");
            }
        }
    }

    let response = match aggregate(&state.config, body).await {
        Ok(json) => {
            tracing::info!(
                request_id = %request_id,
                bytes = json.len(),
                elapsed = ?start_time.elapsed(),
                "Aggregation complete"
            );
            ([(header::CONTENT_TYPE, "application/json")], json).into_response()
        }
        Err(e) => {
            match &e {
                RequestError::BadRequest(reason) => {
                    tracing::info!(request_id = %request_id, reason = %reason, "Rejected request");
                }
                _ => tracing::error!(request_id = %request_id, error = %e, "Aggregation failed"),
            }
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}

/// Run one aggregation and return the serialized JSON array.
pub async fn aggregate(config: &GatewayConfig, body: Body) -> Result<Vec<u8>, RequestError> {
    let read = axum::body::to_bytes(body, config.request.max_body_bytes);
    let bytes = match tokio::time::timeout(config.listener.read_timeout(), read).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "Reading body failed");
            return Err(BadRequest::InvalidBody.into());
        }
        Err(_) => {
            tracing::debug!(timeout = ?config.listener.read_timeout(), "Reading body timed out");
            return Err(BadRequest::InvalidBody.into());
        }
    };

    let list = UrlList::from_slice(&bytes).map_err(|e| {
        tracing::debug!(error = %e, "Unmarshalling body failed");
        BadRequest::MalformedBody
    })?;

    if list.len() > config.upstream.max_urls {
        return Err(BadRequest::TooManyUrls {
            limit: config.upstream.max_urls,
        }
        .into());
    }

    let urls = list.into_urls();
    let fetcher = Fetcher::new(config.upstream.client_timeout())?;
    let bodies = fetcher
        .fetch_all(&urls, config.upstream.max_parallel_fetches)
        .await?;

    let entries = assemble(urls, bodies, config.upstream.data_encoding);
    serde_json::to_vec(&entries).map_err(RequestError::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn aggregation_futures_are_send() {
        let config = GatewayConfig::default();
        assert_send(aggregate(&config, Body::empty()));

        let state = AppState::new(GatewayConfig::default());
        assert_send(aggregate_handler(
            State(state),
            Method::POST,
            HeaderMap::new(),
            Body::empty(),
        ));

        let fetcher = Fetcher::new(config.upstream.client_timeout()).unwrap();
        let urls = vec!["http://a.test/".to_string()];
        assert_send(fetcher.fetch_all(&urls, 2));
    }
}
