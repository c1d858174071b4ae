//! Error types for `roster-core`.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::employee::Field;

/// Per-field validation messages, keyed in column order.
pub type FieldErrors = BTreeMap<Field, String>;

#[derive(Debug, Error)]
pub enum Error {
  /// The record store could not be reached or rejected the call.
  #[error("record store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("employee not found: {0}")]
  NotFound(String),

  #[error("validation failed for {}", field_list(.0))]
  ValidationFailed(FieldErrors),
}

impl Error {
  /// Wrap a backend error as [`Error::StoreUnavailable`].
  pub fn unavailable<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreUnavailable(Box::new(err))
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}

fn field_list(errors: &FieldErrors) -> String {
  errors
    .keys()
    .map(|f| f.id())
    .collect::<Vec<_>>()
    .join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
