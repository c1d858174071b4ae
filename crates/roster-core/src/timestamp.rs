//! Server-assigned timestamps.
//!
//! Stored in documents as `{"seconds": <i64>, "nanoseconds": <u32>}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A point in time with nanosecond precision. Ordered by `seconds`, then
/// `nanoseconds`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp {
  pub seconds:     i64,
  pub nanoseconds: u32,
}

impl Timestamp {
  pub fn new(seconds: i64, nanoseconds: u32) -> Self { Self { seconds, nanoseconds } }

  pub fn now() -> Self { Self::from(Utc::now()) }

  /// The smallest timestamp strictly after `self`.
  pub fn successor(self) -> Self {
    if self.nanoseconds >= 999_999_999 {
      Self::new(self.seconds + 1, 0)
    } else {
      Self::new(self.seconds, self.nanoseconds + 1)
    }
  }

  pub fn to_datetime(self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(self.seconds, self.nanoseconds)
  }

  pub fn to_json(self) -> Value {
    json!({ "seconds": self.seconds, "nanoseconds": self.nanoseconds })
  }

  /// Decode from a stored document value. Malformed values yield `None`.
  pub fn from_json(value: &Value) -> Option<Self> {
    serde_json::from_value(value.clone()).ok()
  }
}

impl From<DateTime<Utc>> for Timestamp {
  fn from(dt: DateTime<Utc>) -> Self {
    Self::new(dt.timestamp(), dt.timestamp_subsec_nanos())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn orders_by_seconds_then_nanos() {
    assert!(Timestamp::new(2, 0) > Timestamp::new(1, 999_999_999));
    assert!(Timestamp::new(1, 5) > Timestamp::new(1, 4));
  }

  #[test]
  fn successor_rolls_over_seconds() {
    assert_eq!(Timestamp::new(1, 999_999_999).successor(), Timestamp::new(2, 0));
    assert_eq!(Timestamp::new(1, 7).successor(), Timestamp::new(1, 8));
  }

  #[test]
  fn malformed_json_decodes_to_none() {
    assert_eq!(Timestamp::from_json(&json!("yesterday")), None);
    assert_eq!(Timestamp::from_json(&json!({ "seconds": 3 })), None);
    assert_eq!(
      Timestamp::from_json(&json!({ "seconds": 3, "nanoseconds": 1 })),
      Some(Timestamp::new(3, 1)),
    );
  }
}
