//! The injected component that performs network I/O.
//!
//! # Design
//! `HttpClient` owns an `Arc<dyn Transport>` rather than reaching for a
//! process-wide handle, so tests substitute a stub and hosts can bring their
//! own HTTP stack. A transport only moves bytes: it must hand back 4xx/5xx
//! responses as data and reserve `Err` for exchanges that produced no
//! response at all. It must also honour `HttpRequest::timeout` itself, so an
//! abandoned exchange releases its connection.

use async_trait::async_trait;
use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

/// Failure to complete an exchange. The client logs it and reports
/// `ApiError::UnknownError`.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes arrived but did not parse as an HTTP response. The client
    /// reports this as `ApiError::InvalidResponse`.
    #[error("malformed response: {reason}")]
    Malformed { reason: String, body: Vec<u8> },

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: u64 },

    #[error("{0}")]
    Other(String),
}

/// Sends one request and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "ureq")]
pub use self::blocking::{UreqTransport, DEFAULT_TIMEOUT};

#[cfg(feature = "ureq")]
mod blocking {
    use std::time::Duration;

    use async_trait::async_trait;
    use ureq::typestate::WithBody;

    use super::{Transport, TransportError};
    use crate::http::{HeaderSet, HttpMethod, HttpRequest, HttpResponse};

    type UreqResponse = ureq::http::Response<ureq::Body>;

    /// Bound on an exchange whose request carries no timeout of its own.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// `Transport` backed by a blocking ureq agent, run on tokio's blocking
    /// pool so the caller's task is never parked on socket I/O.
    ///
    /// Every exchange is bounded: by `HttpRequest::timeout` when set, else by
    /// the agent-wide timeout. When it elapses ureq drops the connection and
    /// the blocking thread is released.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
        body_limit: u64,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self::with_timeout(Some(DEFAULT_TIMEOUT))
        }

        /// Agent-wide timeout for requests without their own. `None` lets
        /// such requests wait indefinitely.
        pub fn with_timeout(timeout: Option<Duration>) -> Self {
            // Status interpretation belongs to the classifier, not ureq.
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self {
                agent,
                body_limit: u64::MAX,
            }
        }

        /// Refuse response bodies larger than `limit` bytes with
        /// `TransportError::BodyTooLarge`. Unlimited by default.
        pub fn with_body_limit(mut self, limit: u64) -> Self {
            self.body_limit = limit;
            self
        }

        fn execute(agent: &ureq::Agent, body_limit: u64, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let HttpRequest {
                method,
                url,
                headers,
                body,
                timeout,
            } = request;

            let result = match method {
                HttpMethod::Get => prepare(agent.get(&url), &headers, timeout).call(),
                HttpMethod::Delete => prepare(agent.delete(&url), &headers, timeout).call(),
                HttpMethod::Post => send(prepare(agent.post(&url), &headers, timeout), body),
                HttpMethod::Put => send(prepare(agent.put(&url), &headers, timeout), body),
                HttpMethod::Patch => send(prepare(agent.patch(&url), &headers, timeout), body),
            };
            let mut response = result.map_err(|e| map_error(e, body_limit))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response
                .body_mut()
                .with_config()
                .limit(body_limit)
                .read_to_vec()
                .map_err(|e| map_error(e, body_limit))?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Transport for UreqTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let agent = self.agent.clone();
            let body_limit = self.body_limit;
            tokio::task::spawn_blocking(move || Self::execute(&agent, body_limit, request))
                .await
                .map_err(|_| TransportError::Cancelled)?
        }
    }

    fn prepare<S>(
        mut builder: ureq::RequestBuilder<S>,
        headers: &HeaderSet,
        timeout: Option<Duration>,
    ) -> ureq::RequestBuilder<S> {
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }
        match timeout {
            Some(limit) => builder.config().timeout_global(Some(limit)).build(),
            None => builder,
        }
    }

    fn send(builder: ureq::RequestBuilder<WithBody>, body: Option<Vec<u8>>) -> Result<UreqResponse, ureq::Error> {
        match body {
            Some(bytes) => builder.send(&bytes[..]),
            None => builder.send_empty(),
        }
    }

    fn map_error(err: ureq::Error, body_limit: u64) -> TransportError {
        match err {
            ureq::Error::Timeout(_) => TransportError::Timeout,
            ureq::Error::Io(e) => TransportError::Io(e),
            ureq::Error::BodyExceedsLimit(_) => TransportError::BodyTooLarge { limit: body_limit },
            ureq::Error::Protocol(e) => TransportError::Malformed {
                reason: e.to_string(),
                body: Vec::new(),
            },
            e @ (ureq::Error::ConnectionFailed | ureq::Error::HostNotFound) => {
                TransportError::Connect(e.to_string())
            }
            other => TransportError::Other(other.to_string()),
        }
    }

}
