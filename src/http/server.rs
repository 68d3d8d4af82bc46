//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the aggregation handler
//! - Wire up middleware (request ID, tracing)
//! - Accept connections from the bounded listener
//! - Serve each connection with HTTP/1.1 and a header read timeout
//! - Drain connections on shutdown within the grace period

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, routing::any, Router};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use thiserror::Error;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::GatewayConfig;
use crate::http::handler::{aggregate_handler, AppState};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::net::{ConnectionTracker, Listener, ListenerError};

/// Failures that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("serve error: {0}")]
    Accept(#[source] ListenerError),

    #[error("server shutdown failed: connections still open after {0:?}")]
    ShutdownTimeout(Duration),
}

/// HTTP server for the fetch gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let state = AppState::new(config);
        let config = Arc::clone(&state.config);
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(aggregate_handler))
            .route("/{*path}", any(aggregate_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered router, for serving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain.
    ///
    /// Returns `ShutdownTimeout` if connections are still open once the
    /// grace period has passed. In-flight upstream fetches are not cancelled
    /// before that.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(address = %addr, "HTTP server starting");
        }

        let mut http = http1::Builder::new();
        http.timer(TokioTimer::new())
            .header_read_timeout(self.config.listener.read_timeout());

        let graceful = GracefulShutdown::new();
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                // Check shutdown first so queued connections are not picked up.
                biased;

                _ = shutdown.recv() => {
                    tracing::info!(
                        active_connections = tracker.active_count(),
                        "Shutdown signal received, draining connections"
                    );
                    break;
                }

                accepted = listener.accept() => {
                    let (stream, peer_addr, permit) = match accepted {
                        Ok(v) => v,
                        Err(e) => match accept_retry_delay(&e) {
                            Some(delay) => {
                                tracing::warn!(error = %e, retry_in = ?delay, "Accept failed, continuing");
                                tokio::time::sleep(delay).await;
                                continue;
                            }
                            None => {
                                tracing::error!(error = %e, "Accept loop failed");
                                return Err(ServerError::Accept(e));
                            }
                        },
                    };

                    let guard = tracker.track();
                    let span = tracing::info_span!("connection", id = %guard.id(), peer = %peer_addr);

                    let app = self.router.clone();
                    let service = service_fn(move |request: Request<Incoming>| {
                        app.clone().oneshot(request.map(Body::new))
                    });
                    let connection = graceful.watch(http.serve_connection(TokioIo::new(stream), service));

                    tokio::spawn(
                        async move {
                            if let Err(e) = connection.await {
                                tracing::debug!(error = %e, "Connection error");
                            }
                            drop(guard);
                            drop(permit);
                        }
                        .instrument(span),
                    );
                }
            }
        }

        // Stop accepting before waiting on the open connections.
        drop(listener);

        let grace = self.config.shutdown.grace_period();
        match tokio::time::timeout(grace, graceful.shutdown()).await {
            Ok(()) => {
                tracing::info!("HTTP server stopped");
                Ok(())
            }
            Err(_) => {
                tracing::error!(
                    grace_period = ?grace,
                    active_connections = tracker.active_count(),
                    "Graceful shutdown deadline exceeded"
                );
                Err(ServerError::ShutdownTimeout(grace))
            }
        }
    }

}

/// Pause after a failed accept before trying again.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// How long to wait before accepting again, or `None` if the loop cannot go on.
///
/// Accept errors (aborted handshakes, descriptor or buffer exhaustion) are
/// transient; only a closed connection limiter ends the server.
fn accept_retry_delay(e: &ListenerError) -> Option<Duration> {
    match e {
        ListenerError::Accept(_) => Some(ACCEPT_ERROR_BACKOFF),
        ListenerError::Bind(_) | ListenerError::Closed => None,
    }
}
