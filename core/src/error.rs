//! Error types for the pet friends API client.
//!
//! # Design
//! HTTP status codes are never errors here: a 403 on a bad password or a 400
//! on a negative age is an answer the caller asserts on, so it comes back as
//! an [`crate::ApiResponse`]. `ApiError` covers only faults that happen in
//! process: the round-trip itself failing, a photo that cannot be read, or a
//! body that does not decode into the shape the caller asked for.

use std::path::PathBuf;

/// Errors returned by the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A photo attachment could not be read from disk.
    #[error("cannot read photo {}: {source}", .path.display())]
    Photo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The response body is not JSON or lacks an expected field.
    #[error("unexpected response body (HTTP {status}): {detail}")]
    UnexpectedBody { status: u16, detail: String },
}
