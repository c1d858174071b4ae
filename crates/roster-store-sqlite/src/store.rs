//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::{path::Path, sync::Arc};

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roster_core::{
  clock::MonotonicClock,
  store::{Document, DocumentData, RecordStore, WriteData, resolve_write},
};

use crate::{
  Error, Result,
  encode::{RawDocument, encode_body},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection and clock are reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  clock: Arc<MonotonicClock>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, clock: Arc::new(MonotonicClock::new()) })
  }
}

fn json_read_error(e: serde_json::Error) -> rusqlite::Error {
  rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

fn json_write_error(e: serde_json::Error) -> rusqlite::Error {
  rusqlite::Error::ToSqlConversionFailure(Box::new(e))
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn get_all(&self, collection: &str) -> Result<Vec<Document>> {
    let collection = collection.to_owned();

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT doc_id, body FROM documents WHERE collection = ?1 ORDER BY doc_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![collection], |row| {
            Ok(RawDocument { doc_id: row.get(0)?, body: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(count = raws.len(), "sqlite get_all");
    let docs = raws
      .into_iter()
      .filter_map(|raw| match raw.into_document() {
        Ok(doc) => Some(doc),
        Err(e) => {
          tracing::warn!(error = %e, "skipping undecodable document");
          None
        }
      })
      .collect();
    Ok(docs)
  }

  async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
    let collection = collection.to_owned();
    let id = id.to_owned();

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT doc_id, body FROM documents WHERE collection = ?1 AND doc_id = ?2",
              rusqlite::params![collection, id],
              |row| Ok(RawDocument { doc_id: row.get(0)?, body: row.get(1)? }),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn add(&self, collection: &str, data: WriteData) -> Result<String> {
    let id = Uuid::new_v4().simple().to_string();
    let body = encode_body(&resolve_write(data, self.clock.now()))?;
    let collection = collection.to_owned();
    let id_param = id.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)",
          rusqlite::params![collection, id_param, body],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(%id, "sqlite add");
    Ok(id)
  }

  async fn update(&self, collection: &str, id: &str, data: WriteData) -> Result<bool> {
    let patch: DocumentData = resolve_write(data, self.clock.now());
    let collection = collection.to_owned();
    let id = id.to_owned();

    // Read-merge-write inside one transaction so the merge sees the latest
    // body.
    let found = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let body: Option<String> = tx
          .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2",
            rusqlite::params![collection, id],
            |row| row.get(0),
          )
          .optional()?;

        let Some(body) = body else {
          return Ok(false);
        };

        let mut merged: DocumentData = serde_json::from_str(&body).map_err(json_read_error)?;
        merged.extend(patch);
        let merged = serde_json::to_string(&merged).map_err(json_write_error)?;

        tx.execute(
          "UPDATE documents SET body = ?3 WHERE collection = ?1 AND doc_id = ?2",
          rusqlite::params![collection, id, merged],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(found)
  }

  async fn delete(&self, collection: &str, id: &str) -> Result<()> {
    let collection = collection.to_owned();
    let id = id.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2",
          rusqlite::params![collection, id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
