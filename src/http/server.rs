//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: ingestion endpoint, metrics scrape, probes
//! - Inject the shared forwarder handle into handler state
//! - Serve until shutdown, then drain within the configured bound
//! - Close the forwarder connection on the way out, drained or not

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{any, get};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::time;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::firehose;
use crate::forward::Forwarder;
use crate::health;
use crate::lifecycle::Shutdown;

/// Application state injected into handlers.
///
/// The forwarder handle is the only process-scoped resource shared across
/// request tasks; everything else is request-scoped.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<dyn Forwarder>,
    pub access_key: String,
    pub forward_address: String,
    pub probe_timeout: Duration,
}

/// Errors terminating the serve loop.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("shutdown drain timed out after {0:?} with requests still in flight")]
    DrainTimeout(Duration),
}

/// HTTP server for the ingestion relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
    forwarder: Arc<dyn Forwarder>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and an
    /// already-connected forwarder.
    pub fn new(
        config: RelayConfig,
        forwarder: Arc<dyn Forwarder>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let state = AppState {
            forwarder: forwarder.clone(),
            access_key: config.auth.access_key.clone(),
            forward_address: config.forward.address.clone(),
            probe_timeout: Duration::from_millis(config.health_check.probe_timeout_ms),
        };
        let router = Self::build_router(state, metrics);
        Self {
            router,
            config,
            forwarder,
        }
    }

    /// Build the Axum router.
    ///
    /// The ingestion endpoint is registered for every method so the
    /// handler owns the method check (400 rather than the router's 405).
    pub fn build_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
        let mut router = Router::new()
            .route("/", any(firehose::handler::ingest))
            .route("/health/live", get(health::liveness))
            .route("/health/ready", get(health::readiness));
        if let Some(handle) = metrics {
            router = router.route("/metrics", get(move || async move { handle.render() }));
        }
        router.with_state(state).layer(TraceLayer::new_for_http())
    }

    /// Serve until shutdown is triggered, drain, and disconnect.
    ///
    /// The drain is bounded by `shutdown.drain_timeout_secs`; exceeding it
    /// returns [`ServeError::DrainTimeout`] after the forwarder connection
    /// has been closed anyway.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), ServeError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            forward = %self.config.forward.address,
            "firehose relay listening"
        );

        let drain_timeout = Duration::from_secs(self.config.shutdown.drain_timeout_secs);
        let mut drain_rx = shutdown.subscribe();
        let mut serve_rx = shutdown.subscribe();

        let app = self.router.into_make_service();
        let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = serve_rx.recv().await;
        });
        let mut server = tokio::spawn(async move { serve.await });

        tokio::select! {
            // Server exited on its own: an accept-loop error, not a drain.
            result = &mut server => {
                self.forwarder.disconnect().await;
                result??;
                Ok(())
            }
            _ = drain_rx.recv() => {
                tracing::info!("shutdown signal received, draining in-flight requests");
                let drained = time::timeout(drain_timeout, &mut server).await;
                self.forwarder.disconnect().await;
                match drained {
                    Ok(result) => {
                        result??;
                        tracing::info!("firehose relay exited cleanly");
                        Ok(())
                    }
                    Err(_) => Err(ServeError::DrainTimeout(drain_timeout)),
                }
            }
        }
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
