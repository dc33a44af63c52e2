//! Liveness and readiness probes.
//!
//! Both probes answer the same question the relay itself depends on: does
//! the downstream forward target accept TCP connections? Each probe dials
//! the target with a short timeout and reports 200 or 503.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use tokio::net::TcpStream;
use tokio::time;

use crate::http::server::AppState;

/// GET /health/live
pub async fn liveness(State(state): State<AppState>) -> StatusCode {
    probe(&state.forward_address, state.probe_timeout).await
}

/// GET /health/ready
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    probe(&state.forward_address, state.probe_timeout).await
}

/// TCP dial against the forward target, bounded by the probe timeout.
async fn probe(address: &str, timeout: Duration) -> StatusCode {
    match time::timeout(timeout, TcpStream::connect(address)).await {
        Ok(Ok(_)) => StatusCode::OK,
        Ok(Err(error)) => {
            tracing::warn!(target = %address, error = %error, "forward target probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => {
            tracing::warn!(target = %address, "forward target probe timed out");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
