//! Request construction: method, URL, merged headers and an encoded body.

use std::time::Duration;

use serde::Serialize;

use crate::codec::BodyCodec;
use crate::error::ApiError;
use crate::headers::HeaderMerger;
use crate::http::{HeaderSet, HttpMethod, HttpRequest};

/// What to do when a request body cannot be serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SerializationPolicy {
    /// Send the request without a body and log a warning.
    #[default]
    Lenient,
    /// Fail the call with `ApiError::Unserializable`.
    Strict,
}

/// Builds `HttpRequest` values from a borrowed codec, header merger and
/// default header set. Performs no I/O.
#[derive(Debug)]
pub struct RequestBuilder<'a, C, M> {
    codec: &'a C,
    merger: &'a M,
    defaults: &'a HeaderSet,
    policy: SerializationPolicy,
    timeout: Option<Duration>,
}

impl<'a, C: BodyCodec, M: HeaderMerger> RequestBuilder<'a, C, M> {
    pub fn new(codec: &'a C, merger: &'a M, defaults: &'a HeaderSet) -> Self {
        Self {
            codec,
            merger,
            defaults,
            policy: SerializationPolicy::default(),
            timeout: None,
        }
    }

    pub fn policy(mut self, policy: SerializationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Deadline stamped on every request this builder produces.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a request without a body.
    pub fn build(&self, method: HttpMethod, url: &str, headers: &HeaderSet) -> HttpRequest {
        HttpRequest {
            method,
            url: url.to_string(),
            headers: self.merger.merge(self.defaults, headers),
            body: None,
            timeout: self.timeout,
        }
    }

    /// Build a request carrying `body` encoded with the codec.
    ///
    /// Under `SerializationPolicy::Lenient` an encoding failure yields a
    /// request with no body; under `Strict` it is returned as an error.
    pub fn build_with_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HeaderSet,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let mut request = self.build(method, url, headers);
        request.body = match self.codec.encode(body) {
            Some(bytes) => Some(bytes),
            None if self.policy == SerializationPolicy::Strict => {
                return Err(ApiError::Unserializable(format!(
                    "{method} {url}: body is not representable as {}",
                    self.codec.content_type()
                )));
            }
            None => {
                tracing::warn!(%method, url, "request body could not be serialized; sending without body");
                None
            }
        };
        Ok(request)
    }
}
