//! Upstream fetch subsystem.
//!
//! # Data Flow
//! ```text
//! Request handler (validated URL list)
//!     → fetcher.rs (fresh client, bounded timeout)
//!     → one GET per URL, in list order
//!     → ordered bodies, or the first failure
//! ```

pub mod fetcher;

pub use fetcher::{FetchError, Fetcher};
