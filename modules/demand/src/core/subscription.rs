//! Subscription binding one producer to one consumer.


use alloc::sync::{Arc, Weak};
use core::{
  fmt,
  hash::{Hash, Hasher},
  sync::atomic::Ordering,
};

use portable_atomic::AtomicBool;

use super::{
  Consumer, DemandCounter, DemandPolicy, LOG_TARGET, Producer, RequestOutcome, SubscriptionConfig, SubscriptionError,
  SubscriptionKey,
};

/// Shared demand link between a producer and a consumer.
///
/// Any thread may call [`request`](Self::request) and [`cancel`](Self::cancel). The requester that
/// moves the demand away from zero (or from the never-requested sentinel) becomes the drain owner
/// and runs the producer's drain pass synchronously; concurrent requesters only update the demand
/// the running pass reads. Both handles are weak: the producer's registry and the application own
/// the collaborators.
pub struct Subscription<T> {
  producer:   Weak<dyn Producer<T>>,
  consumer:   Weak<dyn Consumer<T>>,
  key:        SubscriptionKey,
  demand:     DemandCounter,
  terminated: AtomicBool,
  config:     SubscriptionConfig,
}

impl<T> Subscription<T> {
  /// Creates a subscription with the default configuration.
  #[must_use]
  pub fn new(producer: &Arc<dyn Producer<T>>, consumer: &Arc<dyn Consumer<T>>) -> Self {
    Self::with_config(producer, consumer, SubscriptionConfig::default())
  }

  /// Creates a subscription with the provided configuration.
  #[must_use]
  pub fn with_config(
    producer: &Arc<dyn Producer<T>>,
    consumer: &Arc<dyn Consumer<T>>,
    config: SubscriptionConfig,
  ) -> Self {
    Self {
      producer: Arc::downgrade(producer),
      consumer: Arc::downgrade(consumer),
      key: SubscriptionKey::new(producer.id(), consumer.id()),
      demand: DemandCounter::new(config.demand_policy()),
      terminated: AtomicBool::new(false),
      config,
    }
  }

  /// Grants `elements` more items to the consumer.
  ///
  /// After termination the call is a no-op for any amount. Otherwise the demand is updated
  /// atomically; if no drain pass was in flight, the caller runs one before returning. The
  /// `amount` reported by [`RequestOutcome::Drained`] is the demand read when the pass started;
  /// requests that land later reach the running pass through [`consume`](Self::consume).
  ///
  /// # Errors
  ///
  /// Returns [`SubscriptionError::InvalidDemand`] when `elements` is zero or negative. The
  /// subscription is left untouched in that case.
  pub fn request(&self, elements: i64) -> Result<RequestOutcome, SubscriptionError> {
    if self.is_terminated() {
      return Ok(RequestOutcome::Ignored);
    }
    if elements <= 0 {
      return Err(SubscriptionError::InvalidDemand { requested: elements });
    }

    let previous = self.demand.grant(elements);
    if previous > 0 {
      let demand = match self.demand.policy() {
        | DemandPolicy::Replace => elements,
        | DemandPolicy::Accumulate => previous.saturating_add(elements),
      };
      tracing::trace!(target: LOG_TARGET, key = %self.key, demand, "drain in flight, demand updated");
      return Ok(RequestOutcome::Pending { demand });
    }

    Ok(self.run_drain())
  }

  /// Terminates the subscription and asks the producer to forget it.
  ///
  /// Idempotent: only the call that flips the terminal flag contacts the producer.
  pub fn cancel(&self) {
    if self.terminated.swap(true, Ordering::AcqRel) {
      return;
    }
    tracing::debug!(target: LOG_TARGET, key = %self.key, "subscription cancelled");
    if let Some(producer) = self.producer.upgrade() {
      producer.remove_subscription(&self.key);
    }
  }

  /// Terminates the subscription after the producer completed or failed it.
  ///
  /// Unlike [`cancel`](Self::cancel) the producer is not contacted; it has already dropped the
  /// pairing. Returns `true` when this call ended the subscription, `false` when it was already
  /// cancelled or finished, in which case the consumer must not be signalled again.
  pub fn finish(&self) -> bool {
    if self.terminated.swap(true, Ordering::AcqRel) {
      return false;
    }
    tracing::debug!(target: LOG_TARGET, key = %self.key, "subscription finished by producer");
    true
  }

  fn run_drain(&self) -> RequestOutcome {
    if self.is_terminated() {
      return RequestOutcome::Ignored;
    }
    let Some(producer) = self.producer.upgrade() else {
      tracing::debug!(target: LOG_TARGET, key = %self.key, "producer dropped, cancelling");
      self.cancel();
      return RequestOutcome::Ignored;
    };
    let Some(consumer) = self.consumer.upgrade() else {
      tracing::debug!(target: LOG_TARGET, key = %self.key, "consumer dropped, cancelling");
      self.cancel();
      return RequestOutcome::Ignored;
    };
    let amount = match u64::try_from(self.demand.current()) {
      | Ok(amount) if amount > 0 => amount,
      | _ => return RequestOutcome::Ignored,
    };

    tracing::trace!(target: LOG_TARGET, key = %self.key, amount, "drain owner elected");
    producer.drain(amount, consumer.as_ref(), self);
    RequestOutcome::Drained { amount }
  }

  /// Returns `true` once the subscription was cancelled or finished.
  #[must_use]
  pub fn is_terminated(&self) -> bool {
    self.terminated.load(Ordering::Acquire)
  }

  /// Returns the current demand value.
  ///
  /// [`DemandCounter::UNREQUESTED`] until the first successful request.
  #[must_use]
  pub fn demand(&self) -> i64 {
    self.demand.current()
  }

  /// Records `produced` emitted items and returns the remaining demand.
  ///
  /// Called by the drain owner. A return value of zero ends the pass.
  pub fn consume(&self, produced: u64) -> i64 {
    self.demand.consume(produced)
  }

  /// Returns the identity of the pairing.
  #[must_use]
  pub const fn key(&self) -> SubscriptionKey {
    self.key
  }

  /// Returns the configuration applied at construction.
  #[must_use]
  pub const fn config(&self) -> SubscriptionConfig {
    self.config
  }

  /// Returns the producer if it is still alive.
  #[must_use]
  pub fn producer(&self) -> Option<Arc<dyn Producer<T>>> {
    self.producer.upgrade()
  }

  /// Returns the consumer if it is still alive.
  #[must_use]
  pub fn consumer(&self) -> Option<Arc<dyn Consumer<T>>> {
    self.consumer.upgrade()
  }
}

impl<T> PartialEq for Subscription<T> {
  fn eq(&self, other: &Self) -> bool {
    self.key == other.key
  }
}

impl<T> Eq for Subscription<T> {}

impl<T> Hash for Subscription<T> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.key.hash(state);
  }
}

impl<T> fmt::Display for Subscription<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{demand={}}}", self.demand())
  }
}

impl<T> fmt::Debug for Subscription<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscription")
      .field("key", &self.key)
      .field("demand", &self.demand())
      .field("terminated", &self.is_terminated())
      .finish()
  }
}
