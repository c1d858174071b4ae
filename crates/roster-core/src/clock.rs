//! Monotonic server clock shared by store backends.

use std::sync::Mutex;

use crate::timestamp::Timestamp;

/// Hands out wall-clock timestamps that never repeat or go backwards, so two
/// consecutive writes always carry distinct `updatedAt` values.
#[derive(Debug, Default)]
pub struct MonotonicClock {
  last: Mutex<Option<Timestamp>>,
}

impl MonotonicClock {
  pub fn new() -> Self { Self::default() }

  pub fn now(&self) -> Timestamp {
    let wall = Timestamp::now();
    // The guarded value is always a complete timestamp, poisoned or not.
    let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
    let next = match *last {
      Some(prev) if wall <= prev => prev.successor(),
      _ => wall,
    };
    *last = Some(next);
    next
  }
}
