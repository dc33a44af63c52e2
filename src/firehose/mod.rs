//! Firehose-compatible ingest pipeline.
//!
//! # Data Flow
//! ```text
//! POST /  (Firehose HTTP destination contract)
//!     → handler.rs (method / access-key / request-id checks)
//!     → types.rs   (body + common-attributes decoding)
//!     → forward    (one fluent message per record, best-effort)
//!     → acknowledgment (200) or error.rs (401/400/500 JSON body)
//! ```

pub mod error;
pub mod handler;
pub mod types;

pub use error::ApiError;
pub use types::{CommonAttributes, FirehoseRecord, FirehoseRequest, FirehoseResponse};
