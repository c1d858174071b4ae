//! JSON REST document API for roster.
//!
//! Exposes an axum [`Router`] backed by any [`RecordStore`]. This is the
//! service the terminal panel talks to; it knows nothing about employees,
//! only collections of documents.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = roster_api::app(Arc::new(store));
//! axum::serve(listener, app).await?;
//! ```

pub mod documents;
pub mod error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use roster_core::store::RecordStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5280 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/roster/roster.db") }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the document router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .route(
      "/collections/{collection}/documents",
      get(documents::list::<S>).post(documents::create::<S>),
    )
    .route(
      "/collections/{collection}/documents/{id}",
      get(documents::get_one::<S>)
        .patch(documents::update_one::<S>)
        .delete(documents::delete_one::<S>),
    )
    .with_state(store)
}

/// The full application: the API under `/api`, with request tracing.
pub fn app<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .nest("/api", api_router(store))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use roster_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    app(Arc::new(store))
  }

  async fn oneshot_json(
    app:    Router,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    // Extractor rejections are plain text; treat them as no JSON body.
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
  }

  const DOCS: &str = "/api/collections/employees/documents";

  // ── Create / read ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn empty_collection_lists_nothing() {
    let (status, body) = oneshot_json(make_app().await, "GET", DOCS, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn create_resolves_server_timestamps() {
    let app = make_app().await;
    let (status, created) = oneshot_json(
      app.clone(),
      "POST",
      DOCS,
      Some(json!({ "data": {
        "first_name": "Ada",
        "createdAt":  { ".sv": "timestamp" },
        "updatedAt":  { ".sv": "timestamp" },
      }})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_owned();

    let (status, doc) = oneshot_json(app, "GET", &format!("{DOCS}/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["id"], json!(id));
    assert_eq!(doc["data"]["first_name"], json!("Ada"));
    assert!(doc["data"]["updatedAt"]["seconds"].is_i64());
    assert_eq!(doc["data"]["createdAt"], doc["data"]["updatedAt"]);
  }

  #[tokio::test]
  async fn get_missing_returns_404() {
    let (status, body) = oneshot_json(make_app().await, "GET", &format!("{DOCS}/ghost"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("ghost"));
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn patch_merges_and_404s_for_missing() {
    let app = make_app().await;
    let (_, created) = oneshot_json(
      app.clone(),
      "POST",
      DOCS,
      Some(json!({ "data": { "first_name": "Ada", "last_name": "Lovelace" } })),
    )
    .await;
    let uri = format!("{DOCS}/{}", created["id"].as_str().unwrap());

    let (status, _) = oneshot_json(
      app.clone(),
      "PATCH",
      &uri,
      Some(json!({ "data": { "last_name": "King" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, doc) = oneshot_json(app.clone(), "GET", &uri, None).await;
    assert_eq!(doc["data"], json!({ "first_name": "Ada", "last_name": "King" }));

    let (status, _) = oneshot_json(
      app,
      "PATCH",
      &format!("{DOCS}/ghost"),
      Some(json!({ "data": { "a": "b" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_is_idempotent() {
    let app = make_app().await;
    let (_, created) =
      oneshot_json(app.clone(), "POST", DOCS, Some(json!({ "data": { "a": "b" } }))).await;
    let uri = format!("{DOCS}/{}", created["id"].as_str().unwrap());

    let (status, _) = oneshot_json(app.clone(), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = oneshot_json(app.clone(), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = oneshot_json(app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn malformed_body_is_rejected() {
    let (status, _) = oneshot_json(
      make_app().await,
      "POST",
      DOCS,
      Some(json!({ "not_data": {} })),
    )
    .await;
    assert!(status.is_client_error());
  }

  #[test]
  fn config_defaults_fill_missing_keys() {
    let cfg: ServerConfig = serde_json::from_value(json!({ "port": 9000 })).unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
  }
}
