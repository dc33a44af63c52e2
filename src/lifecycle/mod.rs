//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Connect forwarder → Bind listener → Serve
//!
//! Shutdown (shutdown.rs + http/server.rs):
//!     Signal received → Stop accepting → Drain (bounded) → Disconnect
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Startup is fail-fast: a bad forward address or failed initial
//!   connect aborts the process before the listener binds
//! - Drain is bounded; exceeding the bound is a fatal error, not a
//!   silent forced close

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
