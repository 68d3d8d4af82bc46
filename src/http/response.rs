//! Aggregated response body.
//!
//! # Responsibilities
//! - Pair each requested URL with its upstream body, in request order
//! - Render bodies with the configured encoding
//! - Serialize the whole batch once, after every fetch succeeded

use bytes::Bytes;
use serde::Serialize;

use crate::config::DataEncoding;

/// One fetched upstream in the response array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEntry {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Data")]
    pub data: String,
}

impl ResponseEntry {
    pub fn new(url: String, body: &[u8], encoding: DataEncoding) -> Self {
        Self {
            url,
            data: encode(body, encoding),
        }
    }
}

/// Render an upstream body as a JSON string value.
pub fn encode(body: &[u8], encoding: DataEncoding) -> String {
    match encoding {
        DataEncoding::Text => String::from_utf8_lossy(body).into_owned(),
        DataEncoding::Base64 => base64::encode(body),
    }
}

/// Zip URLs with their bodies. Both slices come from the same ordered fetch.
pub fn assemble(urls: Vec<String>, bodies: Vec<Bytes>, encoding: DataEncoding) -> Vec<ResponseEntry> {
    urls.into_iter()
        .zip(bodies)
        .map(|(url, body)| ResponseEntry::new(url, &body, encoding))
        .collect()
}
