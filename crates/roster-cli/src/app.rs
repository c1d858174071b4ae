//! Application state machine and event dispatcher.
//!
//! Wraps the core controllers and maps key events onto their transitions.
//! Controller errors are never fatal here: they surface as notices in the
//! status bar.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_core::{
  EmployeeRepository,
  employee::{Employee, Field},
  form::{DismissReason, EditFormController},
  listing::ListingController,
  notice::Notice,
  store::RecordStore,
};

// ─── Focus ────────────────────────────────────────────────────────────────────

/// Keyboard focus inside the table screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Navigating rows.
  Table,
  /// Typing into the search box.
  Search,
}

/// Focusable elements of the edit form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
  Input(Field),
  Submit,
  Cancel,
}

impl FormFocus {
  const ORDER: [FormFocus; 8] = [
    FormFocus::Input(Field::FirstName),
    FormFocus::Input(Field::LastName),
    FormFocus::Input(Field::Email),
    FormFocus::Input(Field::PhoneNumber),
    FormFocus::Input(Field::Department),
    FormFocus::Input(Field::Address),
    FormFocus::Submit,
    FormFocus::Cancel,
  ];

  fn index(self) -> usize { Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) }

  pub fn next(self) -> Self { Self::ORDER[(self.index() + 1) % Self::ORDER.len()] }

  pub fn prev(self) -> Self {
    Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S> {
  pub listing:    ListingController<S>,
  pub form:       EditFormController<S>,
  pub mode:       Mode,
  /// Cursor within the visible page.
  pub cursor:     usize,
  pub form_focus: FormFocus,
  /// One-line hint shown when no notice is pending.
  pub status_msg: String,
}

impl<S: RecordStore> App<S> {
  pub fn new(repo: EmployeeRepository<S>) -> Self {
    Self {
      listing:    ListingController::new(repo.clone()),
      form:       EditFormController::new(repo),
      mode:       Mode::Table,
      cursor:     0,
      form_focus: FormFocus::Input(Field::FirstName),
      status_msg: String::new(),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Initial load. Failure leaves an empty table with an error notice.
  pub async fn load(&mut self) {
    self.status_msg = "Loading employees…".into();
    // Failures are surfaced through the listing notice.
    let _ = self.listing.refresh().await;
    self.status_msg.clear();
    self.clamp_cursor();
  }

  // ── Derived state ─────────────────────────────────────────────────────────

  /// The row under the cursor on the current page.
  pub fn cursor_employee(&self) -> Option<&Employee> {
    self.listing.visible_rows().get(self.cursor).copied()
  }

  /// The notice to show, if any: the form's while it is open, else the
  /// listing's.
  pub fn notice(&self) -> Option<&Notice> {
    if self.form.is_open() {
      self.form.notice()
    } else {
      self.listing.notice()
    }
  }

  fn clamp_cursor(&mut self) {
    let len = self.listing.visible_rows().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  fn cursor_id(&self) -> Option<String> { self.cursor_employee().map(|e| e.id.clone()) }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if self.form.is_open() {
      self.handle_form_key(key).await;
      return true;
    }
    if self.listing.viewer().is_open() {
      self.handle_detail_key(key);
      return true;
    }
    match self.mode {
      Mode::Search => {
        self.handle_search_key(key);
        true
      }
      Mode::Table => self.handle_table_key(key).await,
    }
  }

  async fn handle_table_key(&mut self, key: KeyEvent) -> bool {
    self.listing.clear_notice();
    self.status_msg.clear();

    match key.code {
      KeyCode::Char('q') => return false,

      // Row navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.listing.visible_rows().len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),

      // Pagination
      KeyCode::Char(']') | KeyCode::PageDown => {
        self.listing.next_page();
        self.cursor = 0;
      }
      KeyCode::Char('[') | KeyCode::PageUp => {
        self.listing.prev_page();
        self.cursor = 0;
      }
      KeyCode::Char('s') => {
        let next = self.listing.page_size().cycle();
        self.listing.set_page_size(next);
        self.cursor = 0;
      }

      // Search
      KeyCode::Char('/') => self.mode = Mode::Search,

      // Actions
      KeyCode::Char('a') => {
        self.form.open_for_create();
        self.form_focus = FormFocus::Input(Field::FirstName);
      }
      KeyCode::Char('e') => {
        if let Some(employee) = self.cursor_employee().cloned() {
          self.form.open_for_edit(&employee);
          self.form_focus = FormFocus::Input(Field::FirstName);
        }
      }
      KeyCode::Enter | KeyCode::Char('v') => {
        if let Some(id) = self.cursor_id() {
          let _ = self.listing.request_view(&id).await;
        }
      }
      KeyCode::Char('d') | KeyCode::Delete => {
        if let Some(id) = self.cursor_id() {
          if self.listing.request_delete(&id).await.is_ok() {
            self.status_msg = "Employee removed".into();
          }
          self.clamp_cursor();
        }
      }
      KeyCode::Char('r') => {
        let _ = self.listing.refresh().await;
        self.clamp_cursor();
      }

      _ => {}
    }
    true
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    let mut query = self.listing.query().to_owned();
    match key.code {
      KeyCode::Enter => {
        self.mode = Mode::Table;
        return;
      }
      KeyCode::Esc => {
        self.mode = Mode::Table;
        query.clear();
      }
      KeyCode::Backspace => {
        query.pop();
      }
      KeyCode::Char(c) => query.push(c),
      _ => return,
    }
    self.listing.set_query(query);
    self.cursor = 0;
  }

  fn handle_detail_key(&mut self, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
      self.listing.close_viewer();
    }
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
      self.submit_form().await;
      return;
    }

    match key.code {
      KeyCode::Esc => {
        if !self.form.dismiss(DismissReason::EscapeKey) {
          self.status_msg = "Use Cancel to close the form".into();
        }
      }
      KeyCode::Tab | KeyCode::Down => self.form_focus = self.form_focus.next(),
      KeyCode::BackTab | KeyCode::Up => self.form_focus = self.form_focus.prev(),
      KeyCode::Enter => match self.form_focus {
        FormFocus::Input(_) => self.form_focus = self.form_focus.next(),
        FormFocus::Submit => self.submit_form().await,
        FormFocus::Cancel => {
          self.form.cancel();
          self.status_msg.clear();
        }
      },
      KeyCode::Backspace => {
        if let FormFocus::Input(field) = self.form_focus {
          let mut value = field.get(&self.form.draft().fields).to_owned();
          value.pop();
          self.form.set_field(field, value);
        }
      }
      KeyCode::Char(c) => {
        if let FormFocus::Input(field) = self.form_focus {
          let mut value = field.get(&self.form.draft().fields).to_owned();
          value.push(c);
          self.form.set_field(field, value);
        }
      }
      _ => {}
    }
  }

  async fn submit_form(&mut self) {
    match self.form.submit(&mut self.listing).await {
      Ok(Some(_)) => {
        self.status_msg = "Employee saved".into();
        self.clamp_cursor();
      }
      Ok(None) => {}
      Err(_) => {
        // Move focus to the first invalid field, if any.
        if let Some(field) = self.form.errors().keys().next() {
          self.form_focus = FormFocus::Input(*field);
        }
      }
    }
  }
}
