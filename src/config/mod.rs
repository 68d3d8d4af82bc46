//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc with the server and handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults, so a missing file means the stock limits
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, resolve_config, ConfigError};
pub use schema::{
    DataEncoding, GatewayConfig, ListenerConfig, LogFormat, MethodPolicy, ObservabilityConfig,
    RequestConfig, ShutdownConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
