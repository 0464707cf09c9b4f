//! Test doubles shared by the integration suites.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lightwire_core::{BodyCodec, HttpRequest, HttpResponse, JsonCodec, Transport, TransportError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
}

/// What the stub does with every request it receives.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond { status: u16, body: String },
    Garbled { body: String },
    Refuse,
}

/// Deterministic transport: records requests and answers with a fixed reply.
#[derive(Debug)]
pub struct StubTransport {
    reply: Reply,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn respond(status: u16, body: &str) -> Self {
        Self {
            reply: Reply::Respond {
                status,
                body: body.to_string(),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every send receives bytes that are not an HTTP response.
    pub fn garbled(body: &str) -> Self {
        Self {
            reply: Reply::Garbled {
                body: body.to_string(),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every send fails as if the connection were refused.
    pub fn refuse() -> Self {
        Self {
            reply: Reply::Refuse,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Reply::Respond { status, body } => Ok(HttpResponse {
                status: *status,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: body.as_bytes().to_vec(),
            }),
            Reply::Garbled { body } => Err(TransportError::Malformed {
                reason: "missing status line".to_string(),
                body: body.as_bytes().to_vec(),
            }),
            Reply::Refuse => Err(TransportError::Connect("connection refused".to_string())),
        }
    }
}

/// `JsonCodec` that counts how often each direction is used. Clones share
/// the counters.
#[derive(Debug, Clone, Default)]
pub struct CountingCodec {
    encodes: Arc<AtomicUsize>,
    decodes: Arc<AtomicUsize>,
}

impl CountingCodec {
    pub fn encodes(&self) -> usize {
        self.encodes.load(Ordering::SeqCst)
    }

    pub fn decodes(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

impl BodyCodec for CountingCodec {
    fn content_type(&self) -> &'static str {
        JsonCodec.content_type()
    }

    fn encode<B: Serialize + ?Sized>(&self, value: &B) -> Option<Vec<u8>> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        JsonCodec.encode(value)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Option<T> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        JsonCodec.decode(bytes)
    }
}
