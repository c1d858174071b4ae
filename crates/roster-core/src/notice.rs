//! User-visible, non-fatal messages raised by the controllers.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub severity: Severity,
  pub message:  String,
}

impl Notice {
  pub fn warning(message: impl Into<String>) -> Self {
    Self { severity: Severity::Warning, message: message.into() }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self { severity: Severity::Error, message: message.into() }
  }
}

impl fmt::Display for Notice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.message) }
}
