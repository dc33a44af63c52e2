//! Downstream forwarding subsystem.
//!
//! The ingest pipeline only depends on the [`Forwarder`] trait: a single
//! persistent connection exposing connect / send-one-message / disconnect.
//! The concrete [`FluentForwarder`] speaks the Fluentd forward protocol's
//! Message mode over TCP.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

pub mod fluent;

pub use fluent::FluentForwarder;

/// Errors from the forwarding connector.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Send attempted before connect, or after disconnect.
    #[error("not connected to the fluent forwarder")]
    NotConnected,

    /// Socket-level failure while connecting or writing.
    #[error("forwarder I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Message could not be encoded to the wire format.
    #[error("failed to encode forward message: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}

/// A persistent connection to the downstream log aggregator.
///
/// Implementations are expected to serialize concurrent `send_message`
/// calls over the single shared connection; callers do not.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Establish the outbound connection.
    async fn connect(&self) -> Result<(), ForwardError>;

    /// Send one structured message tagged for routing on the aggregator.
    async fn send_message(
        &self,
        tag: &str,
        timestamp: i64,
        record: HashMap<String, String>,
    ) -> Result<(), ForwardError>;

    /// Close the outbound connection.
    async fn disconnect(&self);
}
