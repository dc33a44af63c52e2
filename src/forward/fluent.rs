//! Fluentd forward protocol client (Message mode).
//!
//! Encodes each event as the msgpack array `[tag, time, record]` and writes
//! it to one long-lived TCP connection. No acknowledgments are requested
//! and no reconnect is attempted; a broken connection surfaces as an error
//! on every subsequent send.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::config::ForwardTarget;
use crate::forward::{ForwardError, Forwarder};

/// Forwarder writing Fluentd Message-mode events over TCP.
pub struct FluentForwarder {
    target: ForwardTarget,
    // Concurrent sends from request tasks are serialized here; the wire
    // format has no per-message framing that survives interleaved writes.
    stream: Mutex<Option<TcpStream>>,
}

impl FluentForwarder {
    /// Create a forwarder for the given target. No connection is made
    /// until [`Forwarder::connect`] is called.
    pub fn new(target: ForwardTarget) -> Self {
        Self {
            target,
            stream: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Forwarder for FluentForwarder {
    async fn connect(&self) -> Result<(), ForwardError> {
        let stream = TcpStream::connect((self.target.host.as_str(), self.target.port)).await?;
        tracing::info!(target = %self.target, "connected to fluent forwarder");
        *self.stream.lock().await = Some(stream);
        Ok(())
    }

    async fn send_message(
        &self,
        tag: &str,
        timestamp: i64,
        record: HashMap<String, String>,
    ) -> Result<(), ForwardError> {
        let event = rmp_serde::to_vec(&(tag, timestamp, record))?;
        let mut guard = self.stream.lock().await;
        let stream = guard.as_mut().ok_or(ForwardError::NotConnected)?;
        stream.write_all(&event).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn disconnect(&self) {
        if let Some(mut stream) = self.stream.lock().await.take() {
            let _ = stream.shutdown().await;
            tracing::info!(target = %self.target, "disconnected from fluent forwarder");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn target_for(addr: std::net::SocketAddr) -> ForwardTarget {
        ForwardTarget {
            host: addr.ip().to_string(),
            port: addr.port(),
        }
    }

    #[tokio::test]
    async fn send_without_connect_fails() {
        let forwarder = FluentForwarder::new(ForwardTarget {
            host: "127.0.0.1".to_string(),
            port: 24224,
        });
        let result = forwarder
            .send_message("unknown", 0, HashMap::new())
            .await;
        assert!(matches!(result, Err(ForwardError::NotConnected)));
    }

    #[tokio::test]
    async fn sends_message_mode_event() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            socket.read_to_end(&mut buf).await.unwrap();
            buf
        });

        let forwarder = FluentForwarder::new(target_for(addr));
        forwarder.connect().await.unwrap();
        let record = HashMap::from([
            ("data".to_string(), "hello".to_string()),
            ("type".to_string(), "nginx".to_string()),
        ]);
        forwarder
            .send_message("nginx", 1_700_000_000, record.clone())
            .await
            .unwrap();
        forwarder.disconnect().await;

        let wire = server.await.unwrap();
        let (tag, time, decoded): (String, i64, HashMap<String, String>) =
            rmp_serde::from_slice(&wire).unwrap();
        assert_eq!(tag, "nginx");
        assert_eq!(time, 1_700_000_000);
        assert_eq!(decoded, record);
    }

    #[tokio::test]
    async fn disconnect_then_send_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let forwarder = FluentForwarder::new(target_for(addr));
        forwarder.connect().await.unwrap();
        forwarder.disconnect().await;

        let result = forwarder
            .send_message("unknown", 0, HashMap::new())
            .await;
        assert!(matches!(result, Err(ForwardError::NotConnected)));
    }
}
