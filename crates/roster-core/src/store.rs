//! The `RecordStore` trait and the document types it exchanges.
//!
//! The trait models a hosted document database: named collections of JSON
//! documents addressed by opaque string ids. It is implemented by storage
//! backends (`MemoryStore` here, `roster-store-sqlite`, and the HTTP client in
//! `roster-cli`). The employee repository depends on this abstraction, not on
//! any concrete backend.

use std::{collections::BTreeMap, future::Future};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timestamp::Timestamp;

// ─── Documents ───────────────────────────────────────────────────────────────

/// Field values of a stored document.
pub type DocumentData = serde_json::Map<String, Value>;

/// A document as read back from a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub id:   String,
  pub data: DocumentData,
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Placeholder resolved by the store at write time.
///
/// Serialises as `{".sv": "timestamp"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerValue {
  #[serde(rename = ".sv")]
  pub kind: ServerValueKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerValueKind {
  Timestamp,
}

/// A single field in a write: either a literal JSON value or a server
/// sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WriteValue {
  Server(ServerValue),
  Value(Value),
}

impl WriteValue {
  pub const SERVER_TIMESTAMP: Self =
    Self::Server(ServerValue { kind: ServerValueKind::Timestamp });

  pub fn string(s: impl Into<String>) -> Self { Self::Value(Value::String(s.into())) }
}

/// The fields of one create or update call.
pub type WriteData = BTreeMap<String, WriteValue>;

/// Replace every sentinel in `data` with its resolved value.
///
/// All sentinels in one write resolve to the same `now`.
pub fn resolve_write(data: WriteData, now: Timestamp) -> DocumentData {
  data
    .into_iter()
    .map(|(key, value)| {
      let resolved = match value {
        WriteValue::Server(ServerValue { kind: ServerValueKind::Timestamp }) => {
          now.to_json()
        }
        WriteValue::Value(v) => v,
      };
      (key, resolved)
    })
    .collect()
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a document database backend.
///
/// Every call is a single-document (or single-collection read) round trip.
/// There are no transactions and no batching.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch every document in `collection`, ordered by id.
  fn get_all<'a>(
    &'a self,
    collection: &'a str,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// Fetch one document. Returns `None` if no document has that id.
  fn get<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + 'a;

  /// Persist a new document and return its store-assigned id.
  fn add<'a>(
    &'a self,
    collection: &'a str,
    data: WriteData,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Merge `data` into an existing document.
  ///
  /// Fields not named in `data` are left untouched. Returns `false` if no
  /// document has that id; nothing is written in that case.
  fn update<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
    data: WriteData,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete a document. Deleting a missing id succeeds.
  fn delete<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
