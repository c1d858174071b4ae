//! [`EmployeeRepository`]: employee-shaped reads and writes over a
//! [`RecordStore`].
//!
//! No caching: every call is a fresh round trip to the store.

use std::sync::Arc;

use crate::{
  Error, Result,
  employee::{CREATED_AT, Employee, EmployeeFields, UPDATED_AT},
  store::{RecordStore, WriteValue},
};

/// Collection holding employee documents unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "employees";

pub struct EmployeeRepository<S> {
  store:      Arc<S>,
  collection: String,
}

// Manual impl so that `S` need not be `Clone`.
impl<S> Clone for EmployeeRepository<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), collection: self.collection.clone() }
  }
}

impl<S: RecordStore> EmployeeRepository<S> {
  pub fn new(store: Arc<S>) -> Self { Self::with_collection(store, DEFAULT_COLLECTION) }

  pub fn with_collection(store: Arc<S>, collection: impl Into<String>) -> Self {
    Self { store, collection: collection.into() }
  }

  pub fn collection(&self) -> &str { &self.collection }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// All employees, most recently updated first.
  ///
  /// Records without `updatedAt` sort last. The sort is stable, so ties keep
  /// the store's id order.
  pub async fn list_all(&self) -> Result<Vec<Employee>> {
    let docs = self
      .store
      .get_all(&self.collection)
      .await
      .map_err(Error::unavailable)?;

    let mut employees: Vec<Employee> = docs.into_iter().map(Employee::from_document).collect();
    sort_most_recent_first(&mut employees);

    tracing::debug!(collection = %self.collection, count = employees.len(), "listed employees");
    Ok(employees)
  }

  pub async fn get_by_id(&self, id: &str) -> Result<Employee> {
    self
      .store
      .get(&self.collection, id)
      .await
      .map_err(Error::unavailable)?
      .map(Employee::from_document)
      .ok_or_else(|| Error::NotFound(id.to_owned()))
  }

  /// Persist a new employee; `createdAt` and `updatedAt` are both set by the
  /// store in the same write. Returns the new id.
  pub async fn create(&self, fields: &EmployeeFields) -> Result<String> {
    let mut data = fields.to_write_data();
    data.insert(CREATED_AT.to_owned(), WriteValue::SERVER_TIMESTAMP);
    data.insert(UPDATED_AT.to_owned(), WriteValue::SERVER_TIMESTAMP);

    let id = self
      .store
      .add(&self.collection, data)
      .await
      .map_err(Error::unavailable)?;

    tracing::debug!(collection = %self.collection, %id, "created employee");
    Ok(id)
  }

  /// Overwrite all six fields and refresh `updatedAt`. `createdAt` is never
  /// part of the write.
  pub async fn update(&self, id: &str, fields: &EmployeeFields) -> Result<()> {
    let mut data = fields.to_write_data();
    data.insert(UPDATED_AT.to_owned(), WriteValue::SERVER_TIMESTAMP);

    let found = self
      .store
      .update(&self.collection, id, data)
      .await
      .map_err(Error::unavailable)?;

    if !found {
      return Err(Error::NotFound(id.to_owned()));
    }
    tracing::debug!(collection = %self.collection, %id, "updated employee");
    Ok(())
  }

  /// Delete an employee. Removing an id that does not exist is not an error.
  pub async fn remove(&self, id: &str) -> Result<()> {
    self
      .store
      .delete(&self.collection, id)
      .await
      .map_err(Error::unavailable)?;

    tracing::debug!(collection = %self.collection, %id, "removed employee");
    Ok(())
  }
}

/// Sort by `updated_at` descending, missing timestamps last, stable.
pub fn sort_most_recent_first(employees: &mut [Employee]) {
  // `None < Some(_)`, so reversing the comparison puts `None` at the end.
  employees.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

#[cfg(test)]
mod tests {
  use serde_json::{Value, json};

  use super::*;
  use crate::{memory::MemoryStore, store::DocumentData, timestamp::Timestamp};

  fn repo() -> (MemoryStore, EmployeeRepository<MemoryStore>) {
    let store = MemoryStore::new();
    let repo = EmployeeRepository::new(Arc::new(store.clone()));
    (store, repo)
  }

  fn fields(first: &str, last: &str) -> EmployeeFields {
    EmployeeFields {
      first_name:   first.into(),
      last_name:    last.into(),
      email:        format!("{}@example.com", first.to_lowercase()),
      phone_number: "555-0100".into(),
      department:   "Engineering".into(),
      address:      "1 Infinite Loop".into(),
    }
  }

  fn raw(first: &str, updated: Option<i64>) -> DocumentData {
    let mut value = json!({ "first_name": first });
    if let Some(seconds) = updated {
      value["updatedAt"] = json!({ "seconds": seconds, "nanoseconds": 0 });
    }
    let Value::Object(map) = value else { unreachable!() };
    map
  }

  #[tokio::test]
  async fn create_then_get_has_equal_timestamps() {
    let (_, repo) = repo();
    let id = repo.create(&fields("Ada", "Lovelace")).await.unwrap();
    assert!(!id.is_empty());

    let emp = repo.get_by_id(&id).await.unwrap();
    assert_eq!(emp.id, id);
    assert_eq!(emp.fields, fields("Ada", "Lovelace"));
    assert!(emp.created_at.is_some());
    assert_eq!(emp.created_at, emp.updated_at);
  }

  #[tokio::test]
  async fn update_moves_updated_at_only() {
    let (_, repo) = repo();
    let id = repo.create(&fields("Ada", "Lovelace")).await.unwrap();
    let before = repo.get_by_id(&id).await.unwrap();

    repo.update(&id, &fields("Ada", "King")).await.unwrap();
    let after = repo.get_by_id(&id).await.unwrap();

    assert_eq!(after.fields.last_name, "King");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
  }

  #[tokio::test]
  async fn update_missing_is_not_found() {
    let (_, repo) = repo();
    let err = repo.update("ghost", &fields("Ada", "Lovelace")).await.unwrap_err();
    assert!(err.is_not_found());
  }

  #[tokio::test]
  async fn remove_then_get_is_not_found_and_remove_is_idempotent() {
    let (_, repo) = repo();
    let id = repo.create(&fields("Ada", "Lovelace")).await.unwrap();

    repo.remove(&id).await.unwrap();
    assert!(repo.get_by_id(&id).await.unwrap_err().is_not_found());
    repo.remove(&id).await.unwrap();
  }

  #[tokio::test]
  async fn list_all_sorts_most_recent_first() {
    let (store, repo) = repo();
    store.insert_raw(DEFAULT_COLLECTION, "a", raw("A", Some(3))).await;
    store.insert_raw(DEFAULT_COLLECTION, "b", raw("B", Some(1))).await;
    store.insert_raw(DEFAULT_COLLECTION, "c", raw("C", Some(2))).await;

    let names: Vec<String> = repo
      .list_all()
      .await
      .unwrap()
      .into_iter()
      .map(|e| e.fields.first_name)
      .collect();
    assert_eq!(names, ["A", "C", "B"]);
  }

  #[tokio::test]
  async fn list_all_puts_untimestamped_last_in_stable_order() {
    let (store, repo) = repo();
    store.insert_raw(DEFAULT_COLLECTION, "a", raw("A", None)).await;
    store.insert_raw(DEFAULT_COLLECTION, "b", raw("B", Some(5))).await;
    store.insert_raw(DEFAULT_COLLECTION, "c", raw("C", None)).await;
    store.insert_raw(DEFAULT_COLLECTION, "d", raw("D", Some(5))).await;

    let ids: Vec<String> = repo.list_all().await.unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, ["b", "d", "a", "c"]);
  }

  #[tokio::test]
  async fn store_failure_is_unavailable() {
    let (store, repo) = repo();
    store.set_unavailable(true);
    assert!(matches!(repo.list_all().await, Err(Error::StoreUnavailable(_))));
    assert!(matches!(repo.remove("x").await, Err(Error::StoreUnavailable(_))));
  }

  #[test]
  fn sort_handles_sub_second_precision() {
    let mk = |id: &str, nanos| Employee {
      id:         id.into(),
      fields:     EmployeeFields::default(),
      created_at: None,
      updated_at: Some(Timestamp::new(100, nanos)),
    };
    let mut rows = vec![mk("early", 1), mk("late", 900)];
    sort_most_recent_first(&mut rows);
    assert_eq!(rows[0].id, "late");
  }
}
