//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use firehose_relay::forward::{ForwardError, Forwarder};
use firehose_relay::http::{AppState, HttpServer};

/// Access key the test router is configured with.
pub const TEST_ACCESS_KEY: &str = "test-key";

/// A message captured by the mock forwarder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub tag: String,
    pub timestamp: i64,
    pub record: HashMap<String, String>,
}

/// Forwarder double that records messages instead of writing to a socket.
#[derive(Default)]
pub struct MockForwarder {
    pub sent: Mutex<Vec<SentMessage>>,
    pub fail_sends: AtomicBool,
    pub disconnected: AtomicBool,
}

impl MockForwarder {
    pub fn messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forwarder for MockForwarder {
    async fn connect(&self) -> Result<(), ForwardError> {
        Ok(())
    }

    async fn send_message(
        &self,
        tag: &str,
        timestamp: i64,
        record: HashMap<String, String>,
    ) -> Result<(), ForwardError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ForwardError::NotConnected);
        }
        self.sent.lock().unwrap().push(SentMessage {
            tag: tag.to_string(),
            timestamp,
            record,
        });
        Ok(())
    }

    async fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }
}

/// Handler state around a mock forwarder.
#[allow(dead_code)]
pub fn test_state(forwarder: Arc<MockForwarder>) -> AppState {
    AppState {
        forwarder,
        access_key: TEST_ACCESS_KEY.to_string(),
        forward_address: "127.0.0.1:24224".to_string(),
        probe_timeout: Duration::from_millis(50),
    }
}

/// A router wired to a fresh mock forwarder, without a metrics endpoint.
#[allow(dead_code)]
pub fn test_router() -> (Router, Arc<MockForwarder>) {
    let forwarder = Arc::new(MockForwarder::default());
    let router = HttpServer::build_router(test_state(forwarder.clone()), None);
    (router, forwarder)
}
