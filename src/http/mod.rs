//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Bounded TCP connection
//!     → server.rs (hyper HTTP/1.1, Axum router, request ID + trace layers)
//!     → handler.rs (method policy, body, URL list, fan-out)
//!     → request.rs (payload parsing, request IDs)
//!     → response.rs (ordered entries, body encoding)
//!     → error.rs (status + text for every failure)
//! ```

pub mod error;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use error::{BadRequest, RequestError};
pub use request::{RequestIdExt, UrlList, X_REQUEST_ID};
pub use response::ResponseEntry;
pub use server::{HttpServer, ServerError};
