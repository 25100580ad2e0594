//! Route handlers for the store API.
//!
//! Every response uses the JSend envelope from `kvstash-api`; lookup
//! failures answer 404 with a `fail` envelope carrying the store's
//! `key '<key>' not found` message.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use kvstash_api::{Envelope, Payload};
use kvstash_core::{Store, StoreError, Value};

use crate::auth::{self, BasicCredentials};

/// Builds the application router around an injected store.
pub fn router(store: Store, credentials: Option<BasicCredentials>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/keys", get(list_keys))
        .route(
            "/api/v1/keys/{key}",
            get(get_key).post(set_key).put(update_key).delete(delete_key),
        )
        .with_state(store)
        .layer(middleware::from_fn_with_state(credentials, auth::basic_auth))
}

/// GET /health - liveness probe, exempt from authentication.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "alive": true }))
}

/// GET /api/v1/keys - list the keys of all live entries.
async fn list_keys(State(store): State<Store>) -> Json<Envelope> {
    let keys = store.keys().await;
    tracing::debug!(count = keys.len(), "KEYS");
    Json(Envelope::success(keys.into()))
}

/// GET /api/v1/keys/{key} - fetch one value.
async fn get_key(State(store): State<Store>, Path(key): Path<String>) -> Response {
    tracing::debug!(%key, "GET");
    match store.get(&key).await {
        Ok(value) => Json(Envelope::success(value.into())).into_response(),
        Err(err) => not_found(err),
    }
}

/// POST /api/v1/keys/{key} - insert or replace a value.
async fn set_key(
    State(store): State<Store>,
    Path(key): Path<String>,
    Json(payload): Json<Payload>,
) -> Json<Envelope> {
    tracing::debug!(%key, ttl_ns = payload.ttl, "SET");
    store
        .set(key, Value::from(payload.value), Duration::from_nanos(payload.ttl))
        .await;
    Json(Envelope::success(serde_json::Value::Null))
}

/// PUT /api/v1/keys/{key} - replace an existing value.
async fn update_key(
    State(store): State<Store>,
    Path(key): Path<String>,
    Json(payload): Json<Payload>,
) -> Response {
    tracing::debug!(%key, ttl_ns = payload.ttl, "UPDATE");
    match store
        .update(&key, Value::from(payload.value), Duration::from_nanos(payload.ttl))
        .await
    {
        Ok(()) => Json(Envelope::success(serde_json::Value::Null)).into_response(),
        Err(err) => not_found(err),
    }
}

/// DELETE /api/v1/keys/{key} - remove a key. Absent keys are a no-op.
async fn delete_key(State(store): State<Store>, Path(key): Path<String>) -> Json<Envelope> {
    tracing::debug!(%key, "DELETE");
    store.delete(&key).await;
    Json(Envelope::success(serde_json::Value::Null))
}

fn not_found(err: StoreError) -> Response {
    (StatusCode::NOT_FOUND, Json(Envelope::fail(err.to_string()))).into_response()
}
