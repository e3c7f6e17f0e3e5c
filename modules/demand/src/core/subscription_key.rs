//! Value identity of a (producer, consumer) pairing.


use core::fmt;

use super::{ConsumerId, ProducerId};

/// Key identifying the pairing a subscription binds.
///
/// Registries deduplicate subscriptions on this key; two subscriptions are equal iff their keys
/// are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionKey {
  producer: ProducerId,
  consumer: ConsumerId,
}

impl SubscriptionKey {
  /// Creates a key for the provided pairing.
  #[must_use]
  pub const fn new(producer: ProducerId, consumer: ConsumerId) -> Self {
    Self { producer, consumer }
  }

  /// Returns the producer side of the pairing.
  #[must_use]
  pub const fn producer(&self) -> ProducerId {
    self.producer
  }

  /// Returns the consumer side of the pairing.
  #[must_use]
  pub const fn consumer(&self) -> ConsumerId {
    self.consumer
  }
}

impl fmt::Display for SubscriptionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}->{}", self.producer, self.consumer)
  }
}
