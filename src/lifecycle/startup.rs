//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Bind the bounded listener
//! - Run the HTTP server on a background task
//! - Turn the shutdown signal into a graceful drain
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Nothing here exits the process; `main` decides from the returned error

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::GatewayConfig;
use crate::http::server::ServerError;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::{Listener, ListenerError};
use crate::observability::metrics;

/// Fatal errors of the gateway process.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("metrics exporter failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("signal handler failed: {0}")]
    Signal(#[source] io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Bind, serve and shut down on `signal`.
pub async fn run<F>(config: GatewayConfig, signal: F) -> Result<(), LifecycleError>
where
    F: Future<Output = io::Result<()>>,
{
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| LifecycleError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let listener = Listener::bind(&config.listener).await?;
    serve(config, listener, signal).await
}

/// Serve on an already bound listener until `signal` resolves.
pub async fn serve<F>(config: GatewayConfig, listener: Listener, signal: F) -> Result<(), LifecycleError>
where
    F: Future<Output = io::Result<()>>,
{
    tracing::info!(
        max_connections = config.listener.max_connections,
        read_timeout = ?config.listener.read_timeout(),
        client_timeout = ?config.upstream.client_timeout(),
        max_urls = config.upstream.max_urls,
        grace_period = ?config.shutdown.grace_period(),
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        finished = &mut server_task => {
            // The server only stops on its own when it fails.
            finished??;
            return Ok(());
        }
        received = signal => {
            if let Err(e) = received {
                shutdown.trigger();
                return Err(LifecycleError::Signal(e));
            }
        }
    }

    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
