use alloc::sync::Arc;

use super::{ConsumerId, StreamError, Subscription};

/// Consumer side of a subscription.
///
/// Delivery methods are invoked by the producer during a drain pass, never by the subscription
/// itself.
pub trait Consumer<T>: Send + Sync {
  /// Returns the identifier used in subscription keys.
  fn id(&self) -> ConsumerId;

  /// Receives the subscription once the producer has registered the pairing.
  fn on_subscribe(&self, subscription: &Arc<Subscription<T>>) {
    let _ = subscription;
  }

  /// Receives the next item.
  fn on_next(&self, item: T);

  /// Signals that the producer has no further items.
  fn on_complete(&self);

  /// Signals that the producer failed.
  fn on_error(&self, error: StreamError);
}
