//! Body serialization for outgoing requests and decoding for responses.
//!
//! # Design
//! Codec failures are not errors at this layer: `encode` and `decode` return
//! `None` and leave it to the caller to decide what a missing value means
//! (an absent request body, or `ApiError::NonDecodable`). The underlying
//! serde error is logged at debug level before it is dropped.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A structured-data format for request and response bodies.
pub trait BodyCodec: Send + Sync {
    /// Media type of encoded bodies, named in serialization errors.
    fn content_type(&self) -> &'static str;

    fn encode<B: Serialize + ?Sized>(&self, value: &B) -> Option<Vec<u8>>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Option<T>;
}

/// JSON via `serde_json`.
///
/// Bytes are parsed as they arrive. An empty body is not JSON, so it fails
/// for every target type, `Option<_>` and `()` included.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl BodyCodec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<B: Serialize + ?Sized>(&self, value: &B) -> Option<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|e| tracing::debug!(error = %e, "request body serialization failed"))
            .ok()
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Option<T> {
        serde_json::from_slice(bytes)
            .map_err(|e| tracing::debug!(error = %e, "response body decoding failed"))
            .ok()
    }
}
