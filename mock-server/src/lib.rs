//! Local HTTP fixture for the client's live tests.
//!
//! `/docs` is a schemaless document store: any JSON object can be posted and
//! is stamped with a server-assigned `id`. The remaining routes exist to
//! drive particular response shapes (arbitrary statuses, non-JSON bodies,
//! oversized bodies, header echo).

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// A stored JSON object. Always carries its `id` as a string field.
pub type Document = Map<String, Value>;

pub type Store = Arc<RwLock<HashMap<Uuid, Document>>>;

/// Largest body `/blob/{len}` will produce.
pub const MAX_BLOB_LEN: usize = 64 * 1024 * 1024;

type Reply<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let store: Store = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/docs", get(list_docs).post(create_doc))
        .route(
            "/docs/{id}",
            get(get_doc).put(replace_doc).patch(merge_doc).delete(delete_doc),
        )
        .route("/status/{code}", get(status))
        .route("/raw", get(raw))
        .route("/blob/{len}", get(blob))
        .route("/headers", get(echo_headers))
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    tracing::info!(addr = ?listener.local_addr().ok(), "mock server started");
    axum::serve(listener, app()).await
}

/// Apply a top-level merge to `doc`: `null` removes a key, anything else
/// replaces it. The `id` field is never touched.
pub fn merge(doc: &mut Document, patch: Document) {
    for (key, value) in patch {
        if key == "id" {
            continue;
        }
        if value.is_null() {
            doc.remove(&key);
        } else {
            doc.insert(key, value);
        }
    }
}

fn stamp(id: Uuid, mut doc: Document) -> Document {
    doc.insert("id".to_string(), Value::String(id.to_string()));
    doc
}

async fn list_docs(State(store): State<Store>) -> Json<Vec<Document>> {
    let docs = store.read().await;
    Json(docs.values().cloned().collect())
}

async fn create_doc(State(store): State<Store>, Json(input): Json<Document>) -> (StatusCode, Json<Document>) {
    let id = Uuid::new_v4();
    let doc = stamp(id, input);
    store.write().await.insert(id, doc.clone());
    tracing::debug!(%id, "stored document");
    (StatusCode::CREATED, Json(doc))
}

async fn get_doc(State(store): State<Store>, Path(id): Path<Uuid>) -> Reply<Document> {
    let docs = store.read().await;
    docs.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn replace_doc(State(store): State<Store>, Path(id): Path<Uuid>, Json(input): Json<Document>) -> Reply<Document> {
    let mut docs = store.write().await;
    let doc = docs.get_mut(&id).ok_or_else(not_found)?;
    *doc = stamp(id, input);
    Ok(Json(doc.clone()))
}

async fn merge_doc(State(store): State<Store>, Path(id): Path<Uuid>, Json(patch): Json<Document>) -> Reply<Document> {
    let mut docs = store.write().await;
    let doc = docs.get_mut(&id).ok_or_else(not_found)?;
    merge(doc, patch);
    Ok(Json(doc.clone()))
}

async fn delete_doc(State(store): State<Store>, Path(id): Path<Uuid>) -> Reply<Document> {
    let mut docs = store.write().await;
    let removed = docs.remove(&id).ok_or_else(not_found)?;
    tracing::debug!(%id, "removed document");
    Ok(Json(removed))
}

/// Reply with the requested status code and a small JSON body.
async fn status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, Json(json!({ "status": code }))),
        Err(_) => (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid status code" }))),
    }
}

async fn raw() -> &'static str {
    "not json"
}

/// A JSON string of `len` characters, so the body is `len + 2` bytes.
async fn blob(Path(len): Path<usize>) -> Reply<Value> {
    if len > MAX_BLOB_LEN {
        return Err((StatusCode::BAD_REQUEST, Json(json!({ "error": "blob too large" }))));
    }
    Ok(Json(Value::String("x".repeat(len))))
}

async fn echo_headers(headers: HeaderMap) -> Json<Map<String, Value>> {
    let echoed = headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.as_str().to_string(), Value::String(value))
        })
        .collect();
    Json(echoed)
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn stamp_overrides_client_supplied_id() {
        let id = Uuid::nil();
        let stamped = stamp(id, doc(json!({ "id": "mine", "name": "a" })));
        assert_eq!(stamped["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(stamped["name"], "a");
    }

    #[test]
    fn merge_replaces_and_adds_keys() {
        let mut target = doc(json!({ "id": "1", "name": "a", "tags": ["x"] }));
        merge(&mut target, doc(json!({ "name": "b", "size": 3 })));
        assert_eq!(Value::Object(target), json!({ "id": "1", "name": "b", "tags": ["x"], "size": 3 }));
    }

    #[test]
    fn merge_null_removes_key() {
        let mut target = doc(json!({ "id": "1", "name": "a", "size": 3 }));
        merge(&mut target, doc(json!({ "size": null })));
        assert!(!target.contains_key("size"));
        assert_eq!(target["name"], "a");
    }

    #[test]
    fn merge_never_touches_id() {
        let mut target = doc(json!({ "id": "1" }));
        merge(&mut target, doc(json!({ "id": "2" })));
        assert_eq!(target["id"], "1");
        merge(&mut target, doc(json!({ "id": null })));
        assert_eq!(target["id"], "1");
    }
}
