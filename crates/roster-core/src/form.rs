//! Edit form controller: draft, validation, and submit/cancel transitions.
//!
//! The form closes only through [`EditFormController::cancel`] or a
//! successful [`EditFormController::submit`]. Background clicks and the
//! escape key are ignored (see [`EditFormController::dismiss`]).

use crate::{
  Error, FieldErrors, Result,
  employee::{Employee, EmployeeFields, Field},
  listing::RefreshCallback,
  notice::Notice,
  repository::EmployeeRepository,
  store::RecordStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
  #[default]
  Closed,
  Creating,
  Editing,
}

/// The in-progress copy of an employee's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
  /// Present when editing an existing record.
  pub id:     Option<String>,
  pub fields: EmployeeFields,
}

/// Ways a user may try to close the form other than Cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
  BackdropClick,
  EscapeKey,
}

/// What a successful submit persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
  Created(String),
  Updated(String),
}

/// Required-field check. Only raw emptiness fails; whitespace-only input
/// passes.
pub fn validate(fields: &EmployeeFields) -> FieldErrors {
  Field::ALL
    .into_iter()
    .filter(|f| f.get(fields).is_empty())
    .map(|f| (f, format!("{} is required", f.label())))
    .collect()
}

pub struct EditFormController<S> {
  repo:   EmployeeRepository<S>,
  mode:   FormMode,
  draft:  Draft,
  errors: FieldErrors,
  notice: Option<Notice>,
}

impl<S: RecordStore> EditFormController<S> {
  pub fn new(repo: EmployeeRepository<S>) -> Self {
    Self {
      repo,
      mode: FormMode::Closed,
      draft: Draft::default(),
      errors: FieldErrors::new(),
      notice: None,
    }
  }

  pub fn mode(&self) -> FormMode { self.mode }

  pub fn is_open(&self) -> bool { self.mode != FormMode::Closed }

  pub fn draft(&self) -> &Draft { &self.draft }

  pub fn errors(&self) -> &FieldErrors { &self.errors }

  pub fn error(&self, field: Field) -> Option<&str> { self.errors.get(&field).map(String::as_str) }

  pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

  pub fn title(&self) -> &'static str {
    match self.mode {
      FormMode::Editing => "Edit Employee",
      _ => "Add Employee",
    }
  }

  pub fn submit_label(&self) -> &'static str {
    match self.mode {
      FormMode::Editing => "Update",
      _ => "Add",
    }
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  pub fn open_for_create(&mut self) { self.open(FormMode::Creating, Draft::default()); }

  pub fn open_for_edit(&mut self, employee: &Employee) {
    let draft = Draft { id: Some(employee.id.clone()), fields: employee.fields.clone() };
    self.open(FormMode::Editing, draft);
  }

  fn open(&mut self, mode: FormMode, draft: Draft) {
    self.mode = mode;
    self.draft = draft;
    self.errors.clear();
    self.notice = None;
  }

  /// Update one draft field and clear its error.
  pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
    if !self.is_open() {
      return;
    }
    *field.get_mut(&mut self.draft.fields) = value.into();
    self.errors.remove(&field);
  }

  /// Discard the draft and close.
  pub fn cancel(&mut self) { self.open(FormMode::Closed, Draft::default()); }

  /// Attempt to close the form without Cancel. Always refused; returns
  /// whether the form closed.
  pub fn dismiss(&self, reason: DismissReason) -> bool {
    tracing::debug!(?reason, "ignoring form dismissal");
    false
  }

  /// Validate and persist the draft.
  ///
  /// On validation failure the per-field errors are set and no store call is
  /// made. On store failure a notice is set and the draft is kept. On success
  /// `listing` is refreshed and the form closes. Returns `Ok(None)` if the
  /// form was not open.
  pub async fn submit<R: RefreshCallback>(&mut self, listing: &mut R) -> Result<Option<Submitted>> {
    if !self.is_open() {
      return Ok(None);
    }

    let errors = validate(&self.draft.fields);
    if !errors.is_empty() {
      self.errors = errors.clone();
      return Err(Error::ValidationFailed(errors));
    }

    let outcome = match (self.mode, &self.draft.id) {
      (FormMode::Editing, Some(id)) => self
        .repo
        .update(id, &self.draft.fields)
        .await
        .map(|()| Submitted::Updated(id.clone())),
      _ => self.repo.create(&self.draft.fields).await.map(Submitted::Created),
    };

    match outcome {
      Ok(submitted) => {
        listing.refresh_after_save().await;
        self.cancel();
        Ok(Some(submitted))
      }
      Err(e) => {
        tracing::warn!(error = %e, mode = ?self.mode, "submit failed");
        self.notice = Some(Notice::error(match self.mode {
          FormMode::Editing => "Error in Updating Employee",
          _ => "Error in Adding Employee",
        }));
        Err(e)
      }
    }
  }
}
