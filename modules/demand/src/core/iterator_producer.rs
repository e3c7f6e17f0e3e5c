//! Producer that serves every subscriber from its own iterator.

#[cfg(test)]
mod tests;

use alloc::sync::Arc;
use core::iter::Peekable;

use spin::Mutex;

use super::{
  Consumer, LOG_TARGET, Producer, ProducerId, StreamError, Subscription, SubscriptionConfig, SubscriptionKey,
  SubscriptionRegistry,
};

type SharedSource<I> = Arc<Mutex<Peekable<I>>>;

/// Reference [`Producer`] backed by an iterator factory.
///
/// Each [`subscribe`](Self::subscribe) call creates a fresh iterator for the new consumer, so
/// subscribers never share items. A drain pass emits while demand remains, completes the consumer
/// as soon as the iterator is exhausted and forwards the first `Err` item through
/// [`Consumer::on_error`]. Either way the subscription is [finished](Subscription::finish), so
/// later requests are ignored. The source lock is only held while pulling, never while calling the
/// consumer.
pub struct IteratorProducer<F, I>
where
  I: Iterator, {
  id:      ProducerId,
  factory: F,
  config:  SubscriptionConfig,
  sources: SubscriptionRegistry<SharedSource<I>>,
}

impl<T, F, I> IteratorProducer<F, I>
where
  T: Send + 'static,
  F: Fn() -> I + Send + Sync + 'static,
  I: Iterator<Item = Result<T, StreamError>> + Send + 'static,
{
  /// Creates a producer whose subscriptions use the default configuration.
  #[must_use]
  pub fn new(factory: F) -> Self {
    Self::with_config(factory, SubscriptionConfig::default())
  }

  /// Creates a producer whose subscriptions use `config`.
  #[must_use]
  pub fn with_config(factory: F, config: SubscriptionConfig) -> Self {
    Self { id: ProducerId::next(), factory, config, sources: SubscriptionRegistry::new() }
  }

  /// Pairs `consumer` with this producer.
  ///
  /// Registers a fresh iterator under the new subscription's key and hands the subscription to
  /// [`Consumer::on_subscribe`]. Nothing is emitted until the consumer requests demand.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::DuplicateSubscription`] when `consumer` is already subscribed.
  pub fn subscribe(self: &Arc<Self>, consumer: &Arc<dyn Consumer<T>>) -> Result<Arc<Subscription<T>>, StreamError> {
    let producer: Arc<dyn Producer<T>> = self.clone();
    let subscription = Arc::new(Subscription::with_config(&producer, consumer, self.config));
    let source = Arc::new(Mutex::new((self.factory)().peekable()));
    self.sources.register(subscription.key(), source)?;
    tracing::debug!(target: LOG_TARGET, key = %subscription.key(), "subscription registered");
    consumer.on_subscribe(&subscription);
    Ok(subscription)
  }

  /// Returns the number of subscriptions that have neither completed nor been cancelled.
  #[must_use]
  pub fn active_subscriptions(&self) -> usize {
    self.sources.len()
  }

  /// Returns `true` while the pairing identified by `key` is registered.
  #[must_use]
  pub fn is_active(&self, key: &SubscriptionKey) -> bool {
    self.sources.contains(key)
  }

  fn close(&self, subscription: &Subscription<T>, consumer: &dyn Consumer<T>, error: Option<StreamError>) {
    self.sources.remove(&subscription.key());
    if !subscription.finish() {
      return;
    }
    match error {
      | Some(error) => consumer.on_error(error),
      | None => consumer.on_complete(),
    }
  }
}

impl<T, F, I> Producer<T> for IteratorProducer<F, I>
where
  T: Send + 'static,
  F: Fn() -> I + Send + Sync + 'static,
  I: Iterator<Item = Result<T, StreamError>> + Send + 'static,
{
  fn id(&self) -> ProducerId {
    self.id
  }

  fn drain(&self, amount: u64, consumer: &dyn Consumer<T>, subscription: &Subscription<T>) {
    let key = subscription.key();
    let Some(source) = self.sources.with_entry(&key, |source| source.clone()) else {
      tracing::trace!(target: LOG_TARGET, key = %key, "no active source, drain skipped");
      return;
    };

    let mut emitted = 0_u64;
    loop {
      if subscription.is_terminated() {
        tracing::trace!(target: LOG_TARGET, key = %key, amount, emitted, "drain stopped by cancellation");
        return;
      }
      let next = source.lock().next();
      match next {
        | Some(Ok(item)) => {
          consumer.on_next(item);
          emitted += 1;
          let exhausted = source.lock().peek().is_none();
          if exhausted {
            tracing::trace!(target: LOG_TARGET, key = %key, amount, emitted, "drain completed source");
            self.close(subscription, consumer, None);
            return;
          }
          if subscription.consume(1) <= 0 {
            tracing::trace!(target: LOG_TARGET, key = %key, amount, emitted, "demand satisfied");
            return;
          }
        },
        | Some(Err(error)) => {
          self.close(subscription, consumer, Some(error));
          return;
        },
        | None => {
          self.close(subscription, consumer, None);
          return;
        },
      }
    }
  }

  fn remove_subscription(&self, key: &SubscriptionKey) {
    self.sources.remove(key);
  }
}
