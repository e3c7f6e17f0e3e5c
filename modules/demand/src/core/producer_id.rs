//! Producer identifier used in subscription keys.


use core::{fmt, sync::atomic::Ordering};

use portable_atomic::AtomicU64;

/// Unique identifier for a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProducerId(u64);

impl ProducerId {
  /// Creates a new producer identifier from a raw value.
  #[must_use]
  pub const fn new(value: u64) -> Self {
    Self(value)
  }

  /// Returns the raw identifier value.
  #[must_use]
  pub const fn value(self) -> u64 {
    self.0
  }

  /// Generates a monotonically increasing producer identifier.
  #[must_use]
  pub fn next() -> Self {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
  }
}

impl fmt::Display for ProducerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "producer-{}", self.0)
  }
}
