use crate::core::{ConsumerId, ProducerId, StreamError, SubscriptionKey, SubscriptionRegistry};

fn key(consumer: u64) -> SubscriptionKey {
  SubscriptionKey::new(ProducerId::new(1), ConsumerId::new(consumer))
}

#[test]
fn register_rejects_duplicate_pairing() {
  let registry = SubscriptionRegistry::new();
  assert_eq!(registry.register(key(1), "first"), Ok(()));
  assert_eq!(registry.register(key(1), "second"), Err(StreamError::DuplicateSubscription));
  assert_eq!(registry.with_entry(&key(1), |entry| *entry), Some("first"));
  assert_eq!(registry.len(), 1);
}

#[test]
fn remove_is_idempotent() {
  let registry = SubscriptionRegistry::new();
  registry.register(key(1), 10_u32).expect("register");
  registry.register(key(2), 20_u32).expect("register");

  assert_eq!(registry.remove(&key(1)), Some(10));
  assert_eq!(registry.remove(&key(1)), None);
  assert!(!registry.contains(&key(1)));
  assert!(registry.contains(&key(2)));
  assert_eq!(registry.len(), 1);
}

#[test]
fn removed_pairing_can_register_again() {
  let registry = SubscriptionRegistry::new();
  registry.register(key(3), ()).expect("register");
  registry.remove(&key(3));
  assert!(registry.is_empty());
  assert_eq!(registry.register(key(3), ()), Ok(()));
}

#[test]
fn with_entry_mutates_in_place() {
  let registry = SubscriptionRegistry::default();
  registry.register(key(4), 0_u32).expect("register");
  registry.with_entry(&key(4), |count| *count += 5);
  assert_eq!(registry.with_entry(&key(4), |count| *count), Some(5));
  assert_eq!(registry.with_entry(&key(5), |count| *count), None);
}
