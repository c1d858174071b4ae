//! Listing controller: snapshot, free-text filter, and pagination.
//!
//! The snapshot is replaced wholesale on each successful refresh. Filtering
//! and paging are pure views over it.

use crate::{
  Error, Result,
  detail::DetailViewer,
  employee::{Employee, Field},
  notice::Notice,
  repository::EmployeeRepository,
  store::RecordStore,
};

// ─── Page size ───────────────────────────────────────────────────────────────

/// Rows per page offered by the paginator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
  #[default]
  Ten,
  TwentyFive,
  Hundred,
}

impl PageSize {
  pub const ALL: [PageSize; 3] = [PageSize::Ten, PageSize::TwentyFive, PageSize::Hundred];

  pub fn rows(self) -> usize {
    match self {
      Self::Ten => 10,
      Self::TwentyFive => 25,
      Self::Hundred => 100,
    }
  }

  pub fn from_rows(rows: usize) -> Option<Self> { Self::ALL.into_iter().find(|p| p.rows() == rows) }

  /// The next option, wrapping around.
  pub fn cycle(self) -> Self {
    match self {
      Self::Ten => Self::TwentyFive,
      Self::TwentyFive => Self::Hundred,
      Self::Hundred => Self::Ten,
    }
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Lowercase, collapse whitespace runs to a single space, and trim.
pub fn normalize_query(query: &str) -> String {
  query
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Whether `normalized` (see [`normalize_query`]) occurs in any one of the six
/// fields, compared case-insensitively. Field values are not
/// whitespace-normalized.
pub fn matches(employee: &Employee, normalized: &str) -> bool {
  Field::ALL
    .into_iter()
    .any(|f| employee.get(f).to_lowercase().contains(normalized))
}

/// Rows matching `query`, in snapshot order. An empty query matches all.
pub fn filter<'a>(rows: &'a [Employee], query: &str) -> Vec<&'a Employee> {
  let normalized = normalize_query(query);
  rows.iter().filter(|e| matches(e, &normalized)).collect()
}

// ─── Refresh callback ────────────────────────────────────────────────────────

/// Something that reloads its view after a successful save.
///
/// Implemented by [`ListingController`]; the edit form calls it once a create
/// or update has been persisted.
pub trait RefreshCallback {
  async fn refresh_after_save(&mut self);
}

// ─── Controller ──────────────────────────────────────────────────────────────

pub struct ListingController<S> {
  repo:      EmployeeRepository<S>,
  snapshot:  Vec<Employee>,
  query:     String,
  page:      usize,
  page_size: PageSize,
  viewer:    DetailViewer,
  notice:    Option<Notice>,
}

impl<S: RecordStore> ListingController<S> {
  pub fn new(repo: EmployeeRepository<S>) -> Self {
    Self {
      repo,
      snapshot: Vec::new(),
      query: String::new(),
      page: 0,
      page_size: PageSize::default(),
      viewer: DetailViewer::default(),
      notice: None,
    }
  }

  pub fn repository(&self) -> &EmployeeRepository<S> { &self.repo }

  pub fn snapshot(&self) -> &[Employee] { &self.snapshot }

  pub fn query(&self) -> &str { &self.query }

  pub fn page(&self) -> usize { self.page }

  pub fn page_size(&self) -> PageSize { self.page_size }

  pub fn viewer(&self) -> &DetailViewer { &self.viewer }

  /// Close the detail view (explicit acknowledgement).
  pub fn close_viewer(&mut self) { self.viewer.acknowledge(); }

  pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

  pub fn clear_notice(&mut self) { self.notice = None; }

  // ── Snapshot ──────────────────────────────────────────────────────────────

  /// Reload the snapshot from the repository.
  ///
  /// On failure the previous snapshot stays visible and an error notice is
  /// set.
  pub async fn refresh(&mut self) -> Result<()> {
    let result = self.repo.list_all().await;
    self.apply_refresh(result)
  }

  /// Apply the outcome of a `list_all` call.
  ///
  /// Lets a caller run the fetch elsewhere and hand the result back; each
  /// result is applied as it arrives, so the last one applied wins.
  pub fn apply_refresh(&mut self, result: Result<Vec<Employee>>) -> Result<()> {
    match result {
      Ok(rows) => {
        self.snapshot = rows;
        Ok(())
      }
      Err(e) => {
        tracing::warn!(error = %e, "refresh failed; keeping previous snapshot");
        self.notice = Some(Notice::error("Error in Fetching Employees"));
        Err(e)
      }
    }
  }

  // ── Filter & pagination ───────────────────────────────────────────────────

  /// Set the free-text query. The page index is left as is, so a narrowed
  /// result may leave the current page empty.
  pub fn set_query(&mut self, text: impl Into<String>) { self.query = text.into(); }

  pub fn set_page(&mut self, page: usize) { self.page = page; }

  /// Change rows per page and return to the first page.
  pub fn set_page_size(&mut self, size: PageSize) {
    self.page_size = size;
    self.page = 0;
  }

  pub fn filtered(&self) -> Vec<&Employee> { filter(&self.snapshot, &self.query) }

  pub fn filtered_count(&self) -> usize { self.filtered().len() }

  /// Number of pages for the filtered rows; zero when nothing matches.
  pub fn page_count(&self) -> usize { self.filtered_count().div_ceil(self.page_size.rows()) }

  /// Filtered rows in `[page * size, page * size + size)`.
  pub fn visible_rows(&self) -> Vec<&Employee> {
    let size = self.page_size.rows();
    self
      .filtered()
      .into_iter()
      .skip(self.page.saturating_mul(size))
      .take(size)
      .collect()
  }

  /// Advance one page unless already on the last one.
  pub fn next_page(&mut self) {
    if self.page + 1 < self.page_count() {
      self.page += 1;
    }
  }

  pub fn prev_page(&mut self) { self.page = self.page.saturating_sub(1); }

  // ── Actions ───────────────────────────────────────────────────────────────

  /// Delete `id`, then reload.
  ///
  /// If the delete succeeds but the reload fails, the stale snapshot stays
  /// visible with a warning.
  pub async fn request_delete(&mut self, id: &str) -> Result<()> {
    if let Err(e) = self.repo.remove(id).await {
      tracing::warn!(error = %e, %id, "delete failed");
      self.notice = Some(Notice::error("Error in Removing Employee"));
      return Err(e);
    }

    if let Err(e) = self.refresh().await {
      self.notice = Some(Notice::warning(
        "Employee removed, but the list could not be refreshed",
      ));
      return Err(e);
    }
    Ok(())
  }

  /// Fetch `id` and open it in the detail viewer.
  ///
  /// The viewer is left closed if the fetch fails or the record is gone.
  pub async fn request_view(&mut self, id: &str) -> Result<()> {
    match self.repo.get_by_id(id).await {
      Ok(employee) => {
        self.viewer.open(employee);
        Ok(())
      }
      Err(e) => {
        tracing::warn!(error = %e, %id, "view failed");
        self.notice = Some(Notice::error(match e {
          Error::NotFound(_) => "No Employee Found",
          _ => "Error in Fetching Employee Details",
        }));
        Err(e)
      }
    }
  }
}

impl<S: RecordStore> RefreshCallback for ListingController<S> {
  async fn refresh_after_save(&mut self) {
    // Failures are already surfaced through the notice.
    let _ = self.refresh().await;
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::{
    employee::EmployeeFields,
    memory::{MemoryError, MemoryStore},
    notice::Severity,
    store::{Document, WriteData},
    timestamp::Timestamp,
  };

  fn employee(id: &str, first: &str, dept: &str) -> Employee {
    Employee {
      id:         id.into(),
      fields:     EmployeeFields {
        first_name:   first.into(),
        last_name:    "Smith".into(),
        email:        format!("{}@corp.example", first.to_lowercase()),
        phone_number: "555 0100".into(),
        department:   dept.into(),
        address:      "12  Main Street".into(),
      },
      created_at: None,
      updated_at: Some(Timestamp::new(1, 0)),
    }
  }

  fn numbered(n: usize) -> Vec<Employee> {
    (0..n).map(|i| employee(&format!("e{i:02}"), &format!("Emp{i}"), "Ops")).collect()
  }

  fn controller() -> (MemoryStore, ListingController<MemoryStore>) {
    let store = MemoryStore::new();
    let ctl = ListingController::new(EmployeeRepository::new(Arc::new(store.clone())));
    (store, ctl)
  }

  // ── Filter ────────────────────────────────────────────────────────────────

  #[test]
  fn empty_query_matches_everything() {
    let rows = numbered(3);
    assert_eq!(filter(&rows, "").len(), 3);
    assert_eq!(filter(&rows, "   ").len(), 3);
  }

  #[test]
  fn query_is_case_insensitive_and_whitespace_normalized() {
    let rows = vec![employee("1", "Alice", "Engineering"), employee("2", "Bob", "Sales")];
    let hits = filter(&rows, "  ENGINEER  ");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "1");

    assert_eq!(filter(&rows, "555   0100").len(), 2);
  }

  #[test]
  fn field_values_are_not_normalized() {
    // The stored address has two spaces; a normalized query has one.
    let rows = vec![employee("1", "Alice", "Ops")];
    assert!(filter(&rows, "12 main").is_empty());
    assert_eq!(filter(&rows, "main street").len(), 1);
  }

  #[test]
  fn match_must_fall_within_one_field() {
    let rows = vec![employee("1", "Alice", "Ops")];
    assert!(filter(&rows, "alice smith").is_empty());
  }

  #[test]
  fn every_hit_contains_the_query_in_some_field() {
    let rows = vec![
      employee("1", "Alice", "Engineering"),
      employee("2", "Bob", "Sales"),
      employee("3", "Carol", "Engineering Ops"),
    ];
    for query in ["eng", "bob", "corp", "o", "zzz"] {
      let q = normalize_query(query);
      for hit in filter(&rows, query) {
        assert!(Field::ALL.iter().any(|f| hit.get(*f).to_lowercase().contains(&q)));
      }
    }
  }

  // ── Pagination ────────────────────────────────────────────────────────────

  #[test]
  fn third_page_of_twenty_five_rows_has_five() {
    let (_, mut ctl) = controller();
    ctl.apply_refresh(Ok(numbered(25))).unwrap();
    ctl.set_page(2);

    let visible: Vec<&str> = ctl.visible_rows().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(visible, ["e20", "e21", "e22", "e23", "e24"]);
    assert_eq!(ctl.page_count(), 3);
  }

  #[test]
  fn page_size_change_resets_page() {
    let (_, mut ctl) = controller();
    ctl.apply_refresh(Ok(numbered(60))).unwrap();
    ctl.set_page(4);
    ctl.set_page_size(PageSize::TwentyFive);
    assert_eq!(ctl.page(), 0);
    assert_eq!(ctl.visible_rows().len(), 25);
  }

  #[test]
  fn query_change_keeps_page_index() {
    let (_, mut ctl) = controller();
    ctl.apply_refresh(Ok(numbered(30))).unwrap();
    ctl.set_page(2);
    ctl.set_query("emp1");

    // "emp1" matches Emp1 and Emp10..Emp19, two pages at size 10.
    assert_eq!(ctl.page(), 2);
    assert_eq!(ctl.filtered_count(), 11);
    assert!(ctl.visible_rows().is_empty());
  }

  #[test]
  fn next_page_stops_at_last_page() {
    let (_, mut ctl) = controller();
    ctl.apply_refresh(Ok(numbered(15))).unwrap();
    ctl.next_page();
    ctl.next_page();
    assert_eq!(ctl.page(), 1);
    ctl.prev_page();
    ctl.prev_page();
    assert_eq!(ctl.page(), 0);
  }

  #[test]
  fn page_size_options() {
    assert_eq!(PageSize::from_rows(25), Some(PageSize::TwentyFive));
    assert_eq!(PageSize::from_rows(50), None);
    assert_eq!(PageSize::Hundred.cycle(), PageSize::Ten);
  }

  // ── Refresh & actions ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn failed_refresh_keeps_previous_snapshot() {
    let (store, mut ctl) = controller();
    ctl.repository().create(&employee("", "Ada", "R&D").fields).await.unwrap();
    ctl.refresh().await.unwrap();
    assert_eq!(ctl.snapshot().len(), 1);

    store.set_unavailable(true);
    assert!(ctl.refresh().await.is_err());
    assert_eq!(ctl.snapshot().len(), 1);
    assert_eq!(ctl.notice().map(|n| n.severity), Some(Severity::Error));
  }

  #[test]
  fn last_applied_refresh_wins() {
    let (_, mut ctl) = controller();
    ctl.apply_refresh(Ok(numbered(2))).unwrap();
    ctl.apply_refresh(Ok(numbered(5))).unwrap();
    assert_eq!(ctl.snapshot().len(), 5);
  }

  #[tokio::test]
  async fn delete_removes_row_and_reloads() {
    let (_, mut ctl) = controller();
    let repo = ctl.repository().clone();
    let keep = repo.create(&employee("", "Ada", "R&D").fields).await.unwrap();
    let gone = repo.create(&employee("", "Bob", "R&D").fields).await.unwrap();
    ctl.refresh().await.unwrap();

    ctl.request_delete(&gone).await.unwrap();
    let ids: Vec<&str> = ctl.snapshot().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, [keep.as_str()]);

    // Deleting again is harmless.
    ctl.request_delete(&gone).await.unwrap();
  }

  #[tokio::test]
  async fn delete_failure_keeps_listing() {
    let (store, mut ctl) = controller();
    let id = ctl.repository().create(&employee("", "Ada", "R&D").fields).await.unwrap();
    ctl.refresh().await.unwrap();

    store.set_unavailable(true);
    assert!(ctl.request_delete(&id).await.is_err());
    assert_eq!(ctl.snapshot().len(), 1);
    assert_eq!(ctl.notice().unwrap().message, "Error in Removing Employee");
  }

  type StoreResult<T> = std::result::Result<T, MemoryError>;

  /// Deletes succeed, then every later call fails.
  struct FailsAfterDelete(MemoryStore);

  impl RecordStore for FailsAfterDelete {
    type Error = MemoryError;

    async fn get_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
      self.0.get_all(collection).await
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
      self.0.get(collection, id).await
    }

    async fn add(&self, collection: &str, data: WriteData) -> StoreResult<String> {
      self.0.add(collection, data).await
    }

    async fn update(&self, collection: &str, id: &str, data: WriteData) -> StoreResult<bool> {
      self.0.update(collection, id, data).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
      self.0.delete(collection, id).await?;
      self.0.set_unavailable(true);
      Ok(())
    }
  }

  #[tokio::test]
  async fn delete_then_failed_reload_keeps_stale_rows() {
    let store = MemoryStore::new();
    let mut ctl =
      ListingController::new(EmployeeRepository::new(Arc::new(FailsAfterDelete(store.clone()))));
    let id = ctl.repository().create(&employee("", "Ada", "R&D").fields).await.unwrap();
    ctl.refresh().await.unwrap();

    assert!(ctl.request_delete(&id).await.is_err());
    assert_eq!(ctl.snapshot().len(), 1);
    let notice = ctl.notice().unwrap();
    assert_eq!(notice.severity, Severity::Warning);
    assert_eq!(notice.message, "Employee removed, but the list could not be refreshed");

    // The record itself is gone.
    store.set_unavailable(false);
    assert!(store.get("employees", &id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn view_opens_detail() {
    let (_, mut ctl) = controller();
    let id = ctl.repository().create(&employee("", "Ada", "R&D").fields).await.unwrap();

    ctl.request_view(&id).await.unwrap();
    assert!(ctl.viewer().is_open());
    assert_eq!(ctl.viewer().selected().map(|e| e.id.as_str()), Some(id.as_str()));

    ctl.close_viewer();
    assert!(!ctl.viewer().is_open());
  }

  #[tokio::test]
  async fn view_missing_surfaces_notice() {
    let (_, mut ctl) = controller();
    let err = ctl.request_view("ghost").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!ctl.viewer().is_open());
    assert_eq!(ctl.notice().unwrap().message, "No Employee Found");
  }

  #[tokio::test]
  async fn view_store_failure_keeps_viewer_closed() {
    let (store, mut ctl) = controller();
    let id = ctl.repository().create(&employee("", "Ada", "R&D").fields).await.unwrap();

    store.set_unavailable(true);
    let err = ctl.request_view(&id).await.unwrap_err();
    assert!(!err.is_not_found());
    assert!(!ctl.viewer().is_open());
    let notice = ctl.notice().unwrap();
    assert_eq!(notice.severity, Severity::Error);
    assert_eq!(notice.message, "Error in Fetching Employee Details");
  }
}
