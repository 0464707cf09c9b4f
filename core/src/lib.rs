//! Thin async client for JSON-over-HTTP APIs.
//!
//! # Overview
//! `HttpClient` exposes `get`, `post`, `put`, `patch` and `delete`. Each call
//! builds an `HttpRequest`, hands it to an injected `Transport`, and
//! classifies the `HttpResponse` into either a decoded value or an
//! `ApiError`.
//!
//! # Design
//! - Request building and response classification are pure; only the
//!   transport touches the network, so both sides are testable with a stub.
//! - Codec, header merge strategy and transport are injected rather than
//!   global, and the client carries no mutable state.
//! - No retries, caching or pooling happen here. A caller that wants them
//!   layers them above the client or inside its own transport.

pub mod classify;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod request;
pub mod transport;

pub use classify::{classify_response, StatusClass};
pub use client::HttpClient;
pub use codec::{BodyCodec, JsonCodec};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use headers::{default_headers, merge_headers, HeaderMerger, OverrideMerger};
pub use http::{HeaderSet, HttpMethod, HttpRequest, HttpResponse};
pub use request::{RequestBuilder, SerializationPolicy};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use transport::{Transport, TransportError};
