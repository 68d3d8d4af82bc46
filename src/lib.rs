//! Fetch gateway library.
//!
//! Accepts `{"urls": [...]}` over HTTP, GETs every URL in order and answers
//! with the bodies aggregated as a JSON array, or with the first failure.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
