//! Request-level errors and their HTTP mapping.
//!
//! Client mistakes become 400 with a short message, upstream failures become
//! 500 carrying the failure text, and a failed final serialization is a bare
//! 500. None of these ever leave the handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::upstream::FetchError;

/// The request itself is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BadRequest {
    #[error("Invalid body")]
    InvalidBody,

    #[error("Error marshalling body")]
    MalformedBody,

    #[error("Total urls count limited to {limit}.")]
    TooManyUrls { limit: usize },
}

/// Every way an aggregation request can fail.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    BadRequest(#[from] BadRequest),

    #[error(transparent)]
    Upstream(#[from] FetchError),

    #[error("marshalling response error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RequestError::Upstream(_) | RequestError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match self {
            RequestError::Serialization(_) => self.status().into_response(),
            _ => (self.status(), self.to_string()).into_response(),
        }
    }
}
