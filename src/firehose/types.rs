//! Wire models for the Firehose HTTP delivery contract.
//!
//! Request bodies follow protocol v1.0 of the AWS Kinesis Firehose HTTP
//! destination: camelCase fields, absent fields defaulting rather than
//! rejecting, unknown fields ignored.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Header carrying the static access key.
pub const ACCESS_KEY_HEADER: &str = "x-amz-firehose-access-key";

/// Header carrying the opaque delivery request id.
pub const REQUEST_ID_HEADER: &str = "x-amz-firehose-request-id";

/// Header carrying the optional common-attributes JSON object.
pub const COMMON_ATTRIBUTES_HEADER: &str = "x-amz-firehose-common-attributes";

/// Key inside the common-attributes map that classifies the batch.
pub const EVENT_TYPE_ATTRIBUTE: &str = "X-Event-Type";

/// Classification used when no recognized attribute is present.
pub const DEFAULT_EVENT_TYPE: &str = "unknown";

/// Inbound delivery request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirehoseRequest {
    pub request_id: String,
    pub timestamp: i64,
    pub records: Vec<FirehoseRecord>,
}

/// One opaque payload unit inside a delivery request.
///
/// `data` arrives base64-encoded per the JSON binary-field convention and
/// is decoded during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FirehoseRecord {
    #[serde(default, deserialize_with = "base64_bytes")]
    pub data: Vec<u8>,
}

fn base64_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    BASE64
        .decode(encoded.as_bytes())
        .map_err(serde::de::Error::custom)
}

/// Optional metadata map carried out-of-band in a header.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonAttributes {
    pub common_attributes: HashMap<String, String>,
}

impl CommonAttributes {
    /// The batch classification, when the recognized key is present.
    pub fn event_type(&self) -> Option<&str> {
        self.common_attributes
            .get(EVENT_TYPE_ATTRIBUTE)
            .map(String::as_str)
    }
}

/// Acknowledgment body, produced exactly once per request on every path.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirehoseResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_id: String,

    pub timestamp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FirehoseResponse {
    /// Success acknowledgment echoing the delivery request id.
    pub fn ack(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: now_millis(),
            error_message: None,
        }
    }
}

/// Milliseconds since the Unix epoch, for acknowledgment timestamps.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

/// Seconds since the Unix epoch, for fluent event timestamps.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_delivery_request() {
        let request: FirehoseRequest = serde_json::from_str(
            r#"{"requestId":"req-1","timestamp":1700000000000,"records":[{"data":"aGVsbG8="}]}"#,
        )
        .unwrap();
        assert_eq!(request.request_id, "req-1");
        assert_eq!(request.timestamp, 1_700_000_000_000);
        assert_eq!(request.records.len(), 1);
        assert_eq!(request.records[0].data, b"hello");
    }

    #[test]
    fn absent_fields_default() {
        let request: FirehoseRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.request_id, "");
        assert_eq!(request.timestamp, 0);
        assert!(request.records.is_empty());

        let record: FirehoseRecord = serde_json::from_str("{}").unwrap();
        assert!(record.data.is_empty());
    }

    #[test]
    fn unknown_fields_ignored() {
        let request: FirehoseRequest = serde_json::from_str(
            r#"{"requestId":"req-2","extra":true,"records":[{"data":"aGk=","nested":{"x":1}}]}"#,
        )
        .unwrap();
        assert_eq!(request.request_id, "req-2");
        assert_eq!(request.records[0].data, b"hi");
    }

    #[test]
    fn invalid_base64_rejected() {
        let result: Result<FirehoseRecord, _> =
            serde_json::from_str(r#"{"data":"not base64!!"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn decoding_is_deterministic() {
        let body = r#"{"records":[{"data":"YQ=="},{"data":"Yg=="}]}"#;
        let first: FirehoseRequest = serde_json::from_str(body).unwrap();
        let second: FirehoseRequest = serde_json::from_str(body).unwrap();
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn event_type_from_attributes() {
        let attributes: CommonAttributes = serde_json::from_str(
            r#"{"commonAttributes":{"X-Event-Type":"nginx","team":"platform"}}"#,
        )
        .unwrap();
        assert_eq!(attributes.event_type(), Some("nginx"));

        let empty = CommonAttributes::default();
        assert_eq!(empty.event_type(), None);
    }

    #[test]
    fn ack_serialization_omits_error() {
        let ack = FirehoseResponse::ack("req-3".to_string());
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["requestId"], "req-3");
        assert!(json["timestamp"].as_i64().unwrap() > 0);
        assert!(json.get("errorMessage").is_none());
    }

    #[test]
    fn error_body_omits_empty_request_id() {
        let body = FirehoseResponse {
            request_id: String::new(),
            timestamp: now_millis(),
            error_message: Some("bad request".to_string()),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("requestId").is_none());
        assert_eq!(json["errorMessage"], "bad request");
    }
}
