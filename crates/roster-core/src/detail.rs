//! Read-only projection of a single employee.

use crate::employee::{Employee, Field};

/// Display order of the detail view.
pub const DETAIL_FIELDS: [Field; 6] = [
  Field::FirstName,
  Field::LastName,
  Field::PhoneNumber,
  Field::Email,
  Field::Address,
  Field::Department,
];

/// Holds the selected record while the detail view is open.
#[derive(Debug, Clone, Default)]
pub struct DetailViewer {
  selected: Option<Employee>,
}

impl DetailViewer {
  pub fn open(&mut self, employee: Employee) { self.selected = Some(employee); }

  /// Close the view. This is the only way it closes.
  pub fn acknowledge(&mut self) { self.selected = None; }

  pub fn is_open(&self) -> bool { self.selected.is_some() }

  pub fn selected(&self) -> Option<&Employee> { self.selected.as_ref() }

  /// `(label, value)` pairs for the selected record; empty when closed.
  pub fn rows(&self) -> Vec<(&'static str, &str)> { project(self.selected.as_ref()) }
}

pub fn project(employee: Option<&Employee>) -> Vec<(&'static str, &str)> {
  employee
    .map(|e| DETAIL_FIELDS.iter().map(|f| (f.label(), e.get(*f))).collect())
    .unwrap_or_default()
}
