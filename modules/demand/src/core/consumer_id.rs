//! Consumer identifier used in subscription keys.


use core::{fmt, sync::atomic::Ordering};

use portable_atomic::AtomicU64;

/// Unique identifier for a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(u64);

impl ConsumerId {
  /// Creates a new consumer identifier from a raw value.
  #[must_use]
  pub const fn new(value: u64) -> Self {
    Self(value)
  }

  /// Returns the raw identifier value.
  #[must_use]
  pub const fn value(self) -> u64 {
    self.0
  }

  /// Generates a monotonically increasing consumer identifier.
  #[must_use]
  pub fn next() -> Self {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
  }
}

impl fmt::Display for ConsumerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "consumer-{}", self.0)
  }
}
