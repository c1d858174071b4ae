//! Handlers for `/collections/{collection}/documents` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/collections/{c}/documents` | All documents, ordered by id |
//! | `GET`    | `/collections/{c}/documents/{id}` | 404 if not found |
//! | `POST`   | `/collections/{c}/documents` | Body: [`WriteBody`]; 201 + `{"id": ...}` |
//! | `PATCH`  | `/collections/{c}/documents/{id}` | Body: [`WriteBody`]; merges; 404 if not found |
//! | `DELETE` | `/collections/{c}/documents/{id}` | 204 whether or not the document existed |
//!
//! Field values in a write body may be the sentinel `{".sv": "timestamp"}`,
//! which the store replaces with the write time.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::store::{Document, RecordStore, WriteData};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Request body for create and update.
#[derive(Debug, Serialize, Deserialize)]
pub struct WriteBody {
  pub data: WriteData,
}

/// Response body for create.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
  pub id: String,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /collections/{c}/documents`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(collection): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError>
where
  S: RecordStore,
{
  let docs = store.get_all(&collection).await.map_err(ApiError::store)?;
  Ok(Json(docs))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /collections/{c}/documents/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Document>, ApiError>
where
  S: RecordStore,
{
  let doc = store
    .get(&collection, &id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("document {collection}/{id} not found")))?;
  Ok(Json(doc))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /collections/{c}/documents`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(collection): Path<String>,
  Json(body): Json<WriteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let id = store.add(&collection, body.data).await.map_err(ApiError::store)?;
  tracing::info!(%collection, %id, "document created");
  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /collections/{c}/documents/{id}`
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path((collection, id)): Path<(String, String)>,
  Json(body): Json<WriteBody>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  let found = store
    .update(&collection, &id, body.data)
    .await
    .map_err(ApiError::store)?;
  if !found {
    return Err(ApiError::NotFound(format!("document {collection}/{id} not found")));
  }
  tracing::info!(%collection, %id, "document updated");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /collections/{c}/documents/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  store.delete(&collection, &id).await.map_err(ApiError::store)?;
  tracing::info!(%collection, %id, "document deleted");
  Ok(StatusCode::NO_CONTENT)
}
