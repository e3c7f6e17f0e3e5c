use super::{Consumer, ProducerId, Subscription, SubscriptionKey};

/// Producer side of a subscription.
///
/// Implementations generate items and deliver them to consumers during a drain pass. The
/// subscription guarantees that `drain` is never entered twice concurrently for the same
/// subscription.
pub trait Producer<T>: Send + Sync {
  /// Returns the identifier used in subscription keys.
  fn id(&self) -> ProducerId;

  /// Produces and delivers at most the live demand of `subscription` to `consumer`.
  ///
  /// `amount` is the demand observed when the pass started. Implementations must stop when
  /// [`Subscription::is_terminated`] reports `true`, when their source is exhausted, or when
  /// [`Subscription::consume`] reports no remaining demand. Once `consume` has returned zero the
  /// pass must not emit further items, as the next requester may already own a new pass.
  fn drain(&self, amount: u64, consumer: &dyn Consumer<T>, subscription: &Subscription<T>);

  /// Forgets the subscription identified by `key`.
  ///
  /// Must be idempotent: removing an unknown or already removed key is a no-op.
  fn remove_subscription(&self, key: &SubscriptionKey);
}
