//! OS signal handling.
//!
//! Translates SIGINT/SIGTERM into the internal shutdown trigger. Handler
//! installation failure is a startup defect, so it panics rather than
//! returning an error.

/// Wait until the process receives an interrupt or terminate signal.
pub async fn wait_for_termination() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}
