//! Fetch Gateway
//!
//! An HTTP gateway that fans a posted URL list out to upstream servers and
//! returns the collected bodies as one JSON array.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                  FETCH GATEWAY                   │
//!                     │                                                  │
//!   POST {"urls"}     │  ┌──────────┐    ┌─────────┐    ┌───────────┐    │
//!   ──────────────────┼─▶│   net    │───▶│  http   │───▶│  handler  │    │
//!                     │  │ listener │    │ server  │    │           │    │
//!                     │  └──────────┘    └─────────┘    └─────┬─────┘    │
//!                     │                                       │ per URL  │
//!                     │                                       ▼          │
//!   [{"URL","Data"}]  │                               ┌──────────────┐   │      Upstream
//!   ◀─────────────────┼───────────────────────────────│   upstream   │◀──┼───── servers
//!                     │                               │   fetcher    │   │
//!                     │                               └──────────────┘   │
//!                     │                                                  │
//!                     │   config · observability · lifecycle             │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use fetch_gateway::config::{self, ObservabilityConfig};
use fetch_gateway::lifecycle::{self, signals};
use fetch_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "fetch-gateway")]
#[command(about = "Fetch a list of URLs and return their bodies as JSON", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match config::resolve_config(cli.config.as_deref(), cli.bind) {
        Ok(config) => config,
        Err(e) => {
            // The configured format is unknown, so report with the defaults.
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        "fetch-gateway starting"
    );

    if let Err(e) = lifecycle::run(config, signals::wait_for_signal()).await {
        tracing::error!(error = %e, "Fatal error");
        return Err(e.into());
    }

    Ok(())
}
