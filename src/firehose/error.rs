//! Request-scoped error taxonomy and its JSON rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::firehose::types::{now_millis, FirehoseResponse};

/// Failures that abort a delivery request.
///
/// Every variant renders as the error branch of [`FirehoseResponse`]: the
/// matching HTTP status, a millisecond timestamp, and an `errorMessage`,
/// with the request id echoed when it was known at failure time.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Access key missing or not matching the configured secret.
    #[error("unauthorized")]
    Unauthorized,

    /// Wrong method, missing request id, or undecodable body.
    #[error("bad request")]
    BadRequest { request_id: String },

    /// Uncategorized failure while handling the request.
    #[error("internal server error")]
    Internal { request_id: String },
}

impl ApiError {
    pub fn bad_request(request_id: impl Into<String>) -> Self {
        Self::BadRequest {
            request_id: request_id.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            Self::Unauthorized => "",
            Self::BadRequest { request_id } | Self::Internal { request_id } => request_id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status(), error = %self, "firehose error response");
        let body = FirehoseResponse {
            request_id: self.request_id().to_string(),
            timestamp: now_millis(),
            error_message: Some(self.to_string()),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::bad_request("req-1").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal {
                request_id: String::new()
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn carries_request_id_when_known() {
        assert_eq!(ApiError::Unauthorized.request_id(), "");
        assert_eq!(ApiError::bad_request("req-9").request_id(), "req-9");
    }
}
