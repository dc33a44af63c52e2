//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, one task per connection)
//!     → firehose::handler (ingestion endpoint, "/")
//!     → health (probes) / observability (metrics scrape)
//! ```

pub mod server;

pub use server::{AppState, HttpServer, ServeError};
