//! Inbound request payload and request identifiers.
//!
//! # Responsibilities
//! - Deserialize the URL list payload
//! - Generate a unique request ID (UUID v4) for every request lacking one
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Unknown payload fields are ignored; a missing or null `urls` is empty

use axum::http::{HeaderName, HeaderValue, Request};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Payload of an aggregation request: `{"urls": [...]}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UrlList {
    #[serde(default)]
    urls: Option<Vec<String>>,
}

impl UrlList {
    /// Parse a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn len(&self) -> usize {
        self.urls.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_urls(self) -> Vec<String> {
        self.urls.unwrap_or_default()
    }
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Extension trait to read the request ID from a request's headers.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl RequestIdExt for axum::http::HeaderMap {
    fn request_id(&self) -> &str {
        self.get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_url_list() {
        let list = UrlList::from_slice(br#"{"urls":["http://a.test/ok","http://a.test/ok2"]}"#)
            .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.into_urls(),
            vec!["http://a.test/ok".to_string(), "http://a.test/ok2".to_string()]
        );
    }

    #[test]
    fn missing_or_null_urls_is_empty() {
        assert!(UrlList::from_slice(b"{}").unwrap().is_empty());
        assert!(UrlList::from_slice(br#"{"urls":null}"#).unwrap().is_empty());
        assert!(UrlList::from_slice(br#"{"other":1}"#).unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(UrlList::from_slice(b"not json").is_err());
        assert!(UrlList::from_slice(br#"{"urls":"http://a.test"}"#).is_err());
        assert!(UrlList::from_slice(br#"{"urls":[1,2]}"#).is_err());
    }

    #[test]
    fn request_ids_are_unique() {
        let request = Request::new(());
        let mut make = MakeRequestUuid;
        let a = make.make_request_id(&request).unwrap();
        let b = make.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }

    #[test]
    fn request_id_falls_back_to_unknown() {
        let mut headers = axum::http::HeaderMap::new();
        assert_eq!(headers.request_id(), "unknown");
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));
        assert_eq!(headers.request_id(), "abc");
    }
}
