//! The ingestion endpoint handler.
//!
//! # Responsibilities
//! - Enforce the delivery contract: POST, access key, request id (in that
//!   order; the order decides which error a malformed request receives)
//! - Capture and decode the JSON body, tolerating transport read errors
//! - Classify the batch from the common-attributes header (best-effort)
//! - Hand each record to the forwarder, in input order
//! - Always answer with a JSON acknowledgment
//!
//! # Delivery semantics
//! Forwarding is at-most-effort: a record is sent once and a failed send is
//! logged, counted, and dropped. The acknowledgment does not distinguish
//! "all records forwarded" from "all records failed"; callers that need
//! stronger guarantees must get them from the aggregator side.

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::StreamExt;

use crate::firehose::error::ApiError;
use crate::firehose::types::{
    now_secs, CommonAttributes, FirehoseRecord, FirehoseRequest, FirehoseResponse,
    ACCESS_KEY_HEADER, COMMON_ATTRIBUTES_HEADER, DEFAULT_EVENT_TYPE, REQUEST_ID_HEADER,
};
use crate::forward::Forwarder;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Axum handler for the ingestion endpoint.
///
/// Registered for every method so the 400-on-non-POST contract stays in
/// this pipeline rather than becoming the router's 405.
pub async fn ingest(State(state): State<AppState>, request: Request<Body>) -> Response {
    let response = match process(&state, request).await {
        Ok(response) => response,
        Err(error) => error.into_response(),
    };
    metrics::record_request(response.status().as_u16());
    response
}

async fn process(state: &AppState, request: Request<Body>) -> Result<Response, ApiError> {
    tracing::info!(method = %request.method(), "firehose delivery request received");
    tracing::debug!(headers = ?request.headers(), "delivery request headers");

    if request.method() != Method::POST {
        return Err(ApiError::bad_request(String::new()));
    }
    let access_key = request
        .headers()
        .get(ACCESS_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if access_key.is_empty() || access_key != state.access_key {
        return Err(ApiError::Unauthorized);
    }
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if request_id.is_empty() {
        return Err(ApiError::bad_request(String::new()));
    }

    let event_type = extract_event_type(request.headers());

    let body = capture_body(request.into_body()).await;
    if body.is_empty() {
        tracing::error!(request_id = %request_id, "delivery request body is empty");
        return Err(ApiError::bad_request(request_id));
    }
    let delivery: FirehoseRequest = match serde_json::from_slice(&body) {
        Ok(delivery) => delivery,
        Err(error) => {
            tracing::error!(request_id = %request_id, error = %error, "failed to decode delivery request body");
            return Err(ApiError::bad_request(request_id));
        }
    };

    let summary = forward_records(state.forwarder.as_ref(), &delivery.records, &event_type).await;
    tracing::info!(
        request_id = %request_id,
        forwarded = summary.forwarded,
        failed = summary.failed,
        "records handed to fluent forwarder"
    );
    metrics::record_forwarded(summary.forwarded);
    if summary.failed > 0 {
        metrics::record_forward_failures(summary.failed);
    }

    Ok((StatusCode::OK, Json(FirehoseResponse::ack(request_id))).into_response())
}

/// Decode the common-attributes header into a batch classification.
///
/// This header is best-effort metadata: absence, a non-UTF-8 value, or
/// malformed JSON all fall back to the default event type and never fail
/// the request.
fn extract_event_type(headers: &HeaderMap) -> String {
    let Some(raw) = headers.get(COMMON_ATTRIBUTES_HEADER) else {
        return DEFAULT_EVENT_TYPE.to_string();
    };
    let attributes = raw
        .to_str()
        .map_err(|error| error.to_string())
        .and_then(|value| {
            serde_json::from_str::<CommonAttributes>(value).map_err(|error| error.to_string())
        });
    let attributes = match attributes {
        Ok(attributes) => attributes,
        Err(error) => {
            tracing::error!(error = %error, "failed to parse common attributes");
            return DEFAULT_EVENT_TYPE.to_string();
        }
    };
    for (key, value) in &attributes.common_attributes {
        tracing::debug!(key = %key, value = %value, "common attribute");
    }
    let event_type = attributes
        .event_type()
        .unwrap_or(DEFAULT_EVENT_TYPE)
        .to_string();
    tracing::debug!(event_type = %event_type, "classified delivery batch");
    event_type
}

/// Buffer the whole request body before decoding.
///
/// A transport read error terminates the read but is not propagated:
/// decoding proceeds against whatever bytes were captured, so a truncated
/// body surfaces as a JSON decode failure rather than a read failure. The
/// captured body is kept for diagnostic logging.
async fn capture_body(body: Body) -> Vec<u8> {
    let mut stream = body.into_data_stream();
    let mut captured = Vec::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => captured.extend_from_slice(&bytes),
            Err(error) => {
                tracing::error!(error = %error, "failed to read delivery request body");
                break;
            }
        }
    }
    tracing::debug!(body = %String::from_utf8_lossy(&captured), "delivery request body");
    captured
}

#[derive(Debug, Default)]
struct ForwardSummary {
    forwarded: u64,
    failed: u64,
}

/// Send one fluent message per record, in input order.
///
/// Failures are isolated per record: they are logged and counted but never
/// stop the loop or abort the request.
async fn forward_records(
    forwarder: &dyn Forwarder,
    records: &[FirehoseRecord],
    event_type: &str,
) -> ForwardSummary {
    let mut summary = ForwardSummary::default();
    for record in records {
        let text = String::from_utf8_lossy(&record.data).into_owned();
        tracing::debug!(record = %text, "forwarding record");
        let payload = HashMap::from([
            ("data".to_string(), text),
            ("type".to_string(), event_type.to_string()),
        ]);
        match forwarder
            .send_message(event_type, now_secs(), payload)
            .await
        {
            Ok(()) => summary.forwarded += 1,
            Err(error) => {
                tracing::error!(error = %error, "failed to send message to fluent forwarder");
                summary.failed += 1;
            }
        }
    }
    summary
}
