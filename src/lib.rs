//! Firehose-compatible ingestion relay.
//!
//! Accepts HTTP delivery requests shaped like the AWS Kinesis Firehose
//! HTTP destination contract, validates them, and re-emits each contained
//! record onto the Fluentd forward protocol toward a downstream aggregator.
//!
//! # Architecture Overview
//!
//! ```text
//!  Delivery Request      ┌──────────────────────────────────────────────┐
//!  ────────────────────▶ │  http/server ──▶ firehose/handler            │
//!                        │                    │ validate headers        │
//!                        │                    │ decode body + attrs     │
//!                        │                    ▼                         │
//!  Acknowledgment        │                 forward (one message         │
//!  ◀──────────────────── │                  per record) ────────────────┼──▶ fluent
//!                        │                                              │    aggregator
//!                        │  cross-cutting: config, health probes,       │
//!                        │  observability, lifecycle (signals/drain)    │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! Forwarding is best-effort: per-record send failures are logged and
//! counted but never surfaced in the acknowledgment.

pub mod config;
pub mod firehose;
pub mod forward;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
