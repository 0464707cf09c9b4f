//! Verb-level facade composing request building, transport and
//! classification.
//!
//! # Design
//! `HttpClient` holds only immutable state: the injected transport, codec,
//! header merger and configuration. Each call builds a fresh `HttpRequest`,
//! awaits exactly one exchange, and classifies the response. Clones share
//! the transport and configuration, so one client can serve any number of
//! concurrent tasks without locking.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::classify::classify_response;
use crate::codec::{BodyCodec, JsonCodec};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::headers::{HeaderMerger, OverrideMerger};
use crate::http::{HeaderSet, HttpMethod, HttpRequest, HttpResponse};
use crate::request::RequestBuilder;
use crate::transport::{Transport, TransportError};

/// Async JSON-over-HTTP client.
#[derive(Clone)]
pub struct HttpClient<C = JsonCodec, M = OverrideMerger> {
    transport: Arc<dyn Transport>,
    codec: C,
    merger: M,
    config: Arc<ClientConfig>,
}

impl HttpClient {
    /// Client with the default configuration.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: impl Transport + 'static, config: ClientConfig) -> Self {
        Self::from_shared(Arc::new(transport), config)
    }

    /// Client over a transport that is already shared elsewhere.
    pub fn from_shared(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self {
            transport,
            codec: JsonCodec,
            merger: OverrideMerger,
            config: Arc::new(config),
        }
    }
}

impl<C: BodyCodec, M: HeaderMerger> HttpClient<C, M> {
    /// Replace the body codec.
    pub fn with_codec<C2: BodyCodec>(self, codec: C2) -> HttpClient<C2, M> {
        HttpClient {
            transport: self.transport,
            codec,
            merger: self.merger,
            config: self.config,
        }
    }

    /// Replace the header merge strategy.
    pub fn with_merger<M2: HeaderMerger>(self, merger: M2) -> HttpClient<C, M2> {
        HttpClient {
            transport: self.transport,
            codec: self.codec,
            merger,
            config: self.config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn request_builder(&self) -> RequestBuilder<'_, C, M> {
        RequestBuilder::new(&self.codec, &self.merger, &self.config.default_headers)
            .policy(self.config.serialization)
            .timeout(self.config.timeout)
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str, headers: &HeaderSet) -> Result<T, ApiError> {
        let request = self.build(HttpMethod::Get, url, headers);
        self.execute(request).await
    }

    pub async fn post<T, B>(&self, url: &str, headers: &HeaderSet, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build_with_body(HttpMethod::Post, url, headers, body)?;
        self.execute(request).await
    }

    pub async fn put<T, B>(&self, url: &str, headers: &HeaderSet, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build_with_body(HttpMethod::Put, url, headers, body)?;
        self.execute(request).await
    }

    pub async fn patch<T, B>(&self, url: &str, headers: &HeaderSet, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build_with_body(HttpMethod::Patch, url, headers, body)?;
        self.execute(request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, url: &str, headers: &HeaderSet) -> Result<T, ApiError> {
        let request = self.build(HttpMethod::Delete, url, headers);
        self.execute(request).await
    }

    /// Send a prepared request and classify the response.
    pub async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ApiError> {
        let response = self.exchange(request).await?;
        classify_response(&self.codec, response)
    }

    fn build(&self, method: HttpMethod, url: &str, headers: &HeaderSet) -> HttpRequest {
        self.request_builder()
            .build(method, &self.config.resolve_url(url), headers)
    }

    fn build_with_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HeaderSet,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.request_builder()
            .build_with_body(method, &self.config.resolve_url(url), headers, body)
    }

    /// The single suspension point of a call. The request carries the
    /// configured timeout so the transport can tear the exchange down; the
    /// outer `tokio::time::timeout` bounds transports that ignore it. A
    /// malformed reply becomes `InvalidResponse`; every other transport
    /// failure is logged and reported as `UnknownError`.
    async fn exchange(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(%method, %url, "sending request");

        let send = self.transport.send(request);
        let outcome = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, send)
                .await
                .unwrap_or(Err(TransportError::Timeout)),
            None => send.await,
        };

        outcome.map_err(|err| match err {
            TransportError::Malformed { reason, body } => {
                tracing::debug!(%method, %url, %reason, "malformed response");
                ApiError::InvalidResponse { reason, body }
            }
            err => {
                tracing::warn!(%method, %url, error = %err, "transport failure");
                ApiError::UnknownError
            }
        })
    }
}

impl<C, M> fmt::Debug for HttpClient<C, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
