//! Error types for the HTTP client.
//!
//! # Design
//! Every call either yields a decoded value or exactly one `ApiError`.
//! Variants produced after a response arrived carry the whole `HttpResponse`
//! (status, headers and raw body) so callers can inspect what the server
//! actually sent. Transport failures collapse into `UnknownError`; their cause
//! is logged, not returned.

use thiserror::Error;

use crate::http::HttpResponse;

/// Why a request did not produce a decoded value.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport received bytes that do not form an HTTP response, so
    /// there is no status to classify.
    #[error("invalid HTTP response: {reason}")]
    InvalidResponse { reason: String, body: Vec<u8> },

    /// The status indicated success but the body could not be decoded.
    #[error("HTTP {}: response body could not be decoded", .0.status)]
    NonDecodable(HttpResponse),

    /// The server returned a status in `400..500`.
    #[error("HTTP {}: client error: {}", .0.status, .0.body_text())]
    ClientError(HttpResponse),

    /// The server returned a status of 500 or above.
    #[error("HTTP {}: server error: {}", .0.status, .0.body_text())]
    ServerError(HttpResponse),

    /// The status fell outside every handled range (e.g. 1xx).
    #[error("HTTP {}: unexpected status", .0.status)]
    UnknownRequestError(HttpResponse),

    /// The request never produced a response: connection failure, timeout
    /// or cancellation.
    #[error("request failed before a response was received")]
    UnknownError,

    /// The request body could not be serialized. Only returned under
    /// `SerializationPolicy::Strict`.
    #[error("request body could not be serialized: {0}")]
    Unserializable(String),
}

impl ApiError {
    /// The response this error was derived from, if one was received.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::NonDecodable(r)
            | ApiError::ClientError(r)
            | ApiError::ServerError(r)
            | ApiError::UnknownRequestError(r) => Some(r),
            ApiError::InvalidResponse { .. } | ApiError::UnknownError | ApiError::Unserializable(_) => None,
        }
    }

    /// Raw bytes received from the server, if any.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            ApiError::InvalidResponse { body, .. } => Some(body.as_slice()),
            other => other.response().map(|r| r.body.as_slice()),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }
}
