//! Registry of active subscriptions keyed by their pairing.

#[cfg(test)]
mod tests;

use hashbrown::HashMap;
use spin::Mutex;

use super::{LOG_TARGET, StreamError, SubscriptionKey};

/// Keyed set of active subscriptions held by a producer.
///
/// Each pairing may be registered once. Removal is idempotent, which is what
/// [`Producer::remove_subscription`](super::Producer::remove_subscription) requires. The lock only
/// guards the map; callers must not invoke collaborators from inside [`with_entry`](Self::with_entry)
/// closures that re-enter the registry.
pub struct SubscriptionRegistry<E> {
  entries: Mutex<HashMap<SubscriptionKey, E>>,
}

impl<E> SubscriptionRegistry<E> {
  /// Creates an empty registry.
  #[must_use]
  pub fn new() -> Self {
    Self { entries: Mutex::new(HashMap::new()) }
  }

  /// Registers `entry` under `key`.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::DuplicateSubscription`] when the pairing is already registered.
  pub fn register(&self, key: SubscriptionKey, entry: E) -> Result<(), StreamError> {
    let mut entries = self.entries.lock();
    if entries.contains_key(&key) {
      return Err(StreamError::DuplicateSubscription);
    }
    entries.insert(key, entry);
    Ok(())
  }

  /// Removes the entry registered under `key`.
  ///
  /// Returns `None` when the key is unknown or was already removed.
  pub fn remove(&self, key: &SubscriptionKey) -> Option<E> {
    let removed = self.entries.lock().remove(key);
    if removed.is_some() {
      tracing::debug!(target: LOG_TARGET, key = %key, "subscription unregistered");
    }
    removed
  }

  /// Returns `true` when `key` is registered.
  #[must_use]
  pub fn contains(&self, key: &SubscriptionKey) -> bool {
    self.entries.lock().contains_key(key)
  }

  /// Runs `f` against the entry registered under `key`, if any.
  pub fn with_entry<R>(&self, key: &SubscriptionKey, f: impl FnOnce(&mut E) -> R) -> Option<R> {
    self.entries.lock().get_mut(key).map(f)
  }

  /// Returns the number of registered subscriptions.
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.lock().len()
  }

  /// Returns `true` when no subscription is registered.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.lock().is_empty()
  }
}

impl<E> Default for SubscriptionRegistry<E> {
  fn default() -> Self {
    Self::new()
  }
}
