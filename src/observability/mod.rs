//! Observability subsystem.
//!
//! Structured logging is initialized in `main` via `tracing-subscriber`;
//! per-request logging comes from `tower-http`'s `TraceLayer`. This module
//! owns the metrics side: a Prometheus recorder scraped from the relay's
//! own router.

pub mod metrics;
