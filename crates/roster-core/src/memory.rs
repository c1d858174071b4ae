//! In-process [`RecordStore`] backed by ordered maps.
//!
//! Useful for tests and for running the panel without a server. Supports
//! simulated outages via [`MemoryStore::set_unavailable`].

use std::{
  collections::BTreeMap,
  sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
};

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
  clock::MonotonicClock,
  store::{Document, DocumentData, RecordStore, WriteData, resolve_write},
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("memory store is unavailable")]
  Unavailable,
}

type Collections = BTreeMap<String, BTreeMap<String, DocumentData>>;

#[derive(Default)]
struct Inner {
  collections: RwLock<Collections>,
  clock:       MonotonicClock,
  unavailable: AtomicBool,
  writes:      AtomicUsize,
}

/// A document store held entirely in memory.
///
/// Cloning is cheap: clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Inner>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Make every subsequent call fail (or succeed again with `false`).
  pub fn set_unavailable(&self, unavailable: bool) {
    self.inner.unavailable.store(unavailable, Ordering::SeqCst);
  }

  /// Number of add/update/delete calls that reached the store.
  pub fn write_count(&self) -> usize { self.inner.writes.load(Ordering::SeqCst) }

  /// Store `data` verbatim under `id`, bypassing sentinel resolution. Meant
  /// for seeding fixtures with fixed timestamps.
  pub async fn insert_raw(&self, collection: &str, id: &str, data: DocumentData) {
    self
      .inner
      .collections
      .write()
      .await
      .entry(collection.to_owned())
      .or_default()
      .insert(id.to_owned(), data);
  }

  fn check(&self) -> Result<(), MemoryError> {
    if self.inner.unavailable.load(Ordering::SeqCst) {
      Err(MemoryError::Unavailable)
    } else {
      Ok(())
    }
  }

  fn count_write(&self) { self.inner.writes.fetch_add(1, Ordering::SeqCst); }
}

impl RecordStore for MemoryStore {
  type Error = MemoryError;

  async fn get_all(&self, collection: &str) -> Result<Vec<Document>, MemoryError> {
    self.check()?;
    let collections = self.inner.collections.read().await;
    Ok(
      collections
        .get(collection)
        .map(|docs| {
          docs
            .iter()
            .map(|(id, data)| Document { id: id.clone(), data: data.clone() })
            .collect()
        })
        .unwrap_or_default(),
    )
  }

  async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, MemoryError> {
    self.check()?;
    let collections = self.inner.collections.read().await;
    Ok(
      collections
        .get(collection)
        .and_then(|docs| docs.get(id))
        .map(|data| Document { id: id.to_owned(), data: data.clone() }),
    )
  }

  async fn add(&self, collection: &str, data: WriteData) -> Result<String, MemoryError> {
    self.check()?;
    self.count_write();
    let id = Uuid::new_v4().simple().to_string();
    let data = resolve_write(data, self.inner.clock.now());
    self
      .inner
      .collections
      .write()
      .await
      .entry(collection.to_owned())
      .or_default()
      .insert(id.clone(), data);
    Ok(id)
  }

  async fn update(
    &self,
    collection: &str,
    id: &str,
    data: WriteData,
  ) -> Result<bool, MemoryError> {
    self.check()?;
    self.count_write();
    let mut collections = self.inner.collections.write().await;
    let Some(existing) = collections.get_mut(collection).and_then(|docs| docs.get_mut(id))
    else {
      return Ok(false);
    };
    existing.extend(resolve_write(data, self.inner.clock.now()));
    Ok(true)
  }

  async fn delete(&self, collection: &str, id: &str) -> Result<(), MemoryError> {
    self.check()?;
    self.count_write();
    if let Some(docs) = self.inner.collections.write().await.get_mut(collection) {
      docs.remove(id);
    }
    Ok(())
  }
}
