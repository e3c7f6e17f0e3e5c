extern crate std;

use alloc::{sync::Arc, vec, vec::Vec};
use core::{iter::Map, ops::Range};
use std::sync::Mutex;

use crate::core::{
  Consumer, ConsumerId, DemandPolicy, IteratorProducer, Producer, RequestOutcome, StreamError, Subscription,
  SubscriptionConfig,
};

type Counting = Map<Range<u32>, fn(u32) -> Result<u32, StreamError>>;

fn counting(limit: u32) -> impl Fn() -> Counting + Send + Sync + 'static {
  move || (0..limit).map(Ok as fn(u32) -> Result<u32, StreamError>)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
  Next(u32),
  Complete,
  Error(StreamError),
}

struct CollectingConsumer {
  id:              ConsumerId,
  events:          Mutex<Vec<Event>>,
  subscription:    Mutex<Option<Arc<Subscription<u32>>>>,
  cancel_after:    Option<usize>,
  request_on_next: Option<i64>,
}

impl CollectingConsumer {
  fn build(cancel_after: Option<usize>, request_on_next: Option<i64>) -> Arc<Self> {
    Arc::new(Self {
      id: ConsumerId::next(),
      events: Mutex::new(Vec::new()),
      subscription: Mutex::new(None),
      cancel_after,
      request_on_next,
    })
  }

  fn new() -> Arc<Self> {
    Self::build(None, None)
  }

  fn cancelling_after(count: usize) -> Arc<Self> {
    Self::build(Some(count), None)
  }

  fn requesting_one_per_item() -> Arc<Self> {
    Self::build(None, Some(1))
  }

  fn requesting_two_per_item() -> Arc<Self> {
    Self::build(None, Some(2))
  }

  fn events(&self) -> Vec<Event> {
    self.events.lock().unwrap().clone()
  }

  fn subscription(&self) -> Option<Arc<Subscription<u32>>> {
    self.subscription.lock().unwrap().clone()
  }
}

impl Consumer<u32> for CollectingConsumer {
  fn id(&self) -> ConsumerId {
    self.id
  }

  fn on_subscribe(&self, subscription: &Arc<Subscription<u32>>) {
    *self.subscription.lock().unwrap() = Some(subscription.clone());
  }

  fn on_next(&self, item: u32) {
    let received = {
      let mut events = self.events.lock().unwrap();
      events.push(Event::Next(item));
      events.len()
    };
    let Some(subscription) = self.subscription() else {
      return;
    };
    if self.cancel_after == Some(received) {
      subscription.cancel();
    }
    if let Some(elements) = self.request_on_next {
      subscription.request(elements).unwrap();
    }
  }

  fn on_complete(&self) {
    self.events.lock().unwrap().push(Event::Complete);
  }

  fn on_error(&self, error: StreamError) {
    self.events.lock().unwrap().push(Event::Error(error));
  }
}

fn subscribe<F, I>(
  producer: &Arc<IteratorProducer<F, I>>,
  consumer: &Arc<CollectingConsumer>,
) -> Arc<Subscription<u32>>
where
  F: Fn() -> I + Send + Sync + 'static,
  I: Iterator<Item = Result<u32, StreamError>> + Send + 'static, {
  let consumer: Arc<dyn Consumer<u32>> = consumer.clone();
  producer.subscribe(&consumer).unwrap()
}

fn nexts(values: Range<u32>) -> Vec<Event> {
  values.map(Event::Next).collect()
}

#[test]
fn subscribe_hands_subscription_to_consumer_without_emitting() {
  let producer = Arc::new(IteratorProducer::new(counting(10)));
  let consumer = CollectingConsumer::new();

  let subscription = subscribe(&producer, &consumer);

  assert_eq!(consumer.subscription().as_deref(), Some(&*subscription));
  assert!(consumer.events().is_empty());
  assert!(producer.is_active(&subscription.key()));
  assert_eq!(subscription.key().producer(), Producer::<u32>::id(&*producer));
}

#[test]
fn drain_emits_exactly_the_requested_items() {
  let producer = Arc::new(IteratorProducer::new(counting(10)));
  let consumer = CollectingConsumer::new();
  let subscription = subscribe(&producer, &consumer);

  assert_eq!(subscription.request(3), Ok(RequestOutcome::Drained { amount: 3 }));
  assert_eq!(consumer.events(), nexts(0..3));
  assert_eq!(subscription.demand(), 0);

  subscription.request(2).unwrap();
  assert_eq!(consumer.events(), nexts(0..5));
  assert_eq!(producer.active_subscriptions(), 1);
}

#[test]
fn drain_completes_when_source_runs_out_before_demand() {
  let producer = Arc::new(IteratorProducer::new(counting(3)));
  let consumer = CollectingConsumer::new();
  let subscription = subscribe(&producer, &consumer);

  subscription.request(5).unwrap();

  let mut expected = nexts(0..3);
  expected.push(Event::Complete);
  assert_eq!(consumer.events(), expected);
  assert_eq!(producer.active_subscriptions(), 0);
}

#[test]
fn drain_completes_eagerly_when_demand_matches_source_length() {
  let producer = Arc::new(IteratorProducer::new(counting(3)));
  let consumer = CollectingConsumer::new();
  let subscription = subscribe(&producer, &consumer);

  subscription.request(3).unwrap();

  assert_eq!(consumer.events().last(), Some(&Event::Complete));
  assert!(!producer.is_active(&subscription.key()));
}

#[test]
fn empty_source_completes_on_first_request() {
  let producer = Arc::new(IteratorProducer::new(counting(0)));
  let consumer = CollectingConsumer::new();
  let subscription = subscribe(&producer, &consumer);

  subscription.request(1).unwrap();

  assert_eq!(consumer.events(), vec![Event::Complete]);
  assert_eq!(producer.active_subscriptions(), 0);
}

#[test]
fn source_error_is_forwarded_and_ends_the_subscription() {
  let producer = Arc::new(IteratorProducer::new(|| vec![Ok(1_u32), Err(StreamError::Failed), Ok(2)].into_iter()));
  let consumer = CollectingConsumer::new();
  let subscription = subscribe(&producer, &consumer);

  subscription.request(10).unwrap();

  assert_eq!(consumer.events(), vec![Event::Next(1), Event::Error(StreamError::Failed)]);
  assert_eq!(producer.active_subscriptions(), 0);
}

#[test]
fn duplicate_subscribe_is_rejected() {
  let producer = Arc::new(IteratorProducer::new(counting(1)));
  let consumer: Arc<dyn Consumer<u32>> = CollectingConsumer::new();

  producer.subscribe(&consumer).unwrap();

  assert_eq!(producer.subscribe(&consumer).err(), Some(StreamError::DuplicateSubscription));
  assert_eq!(producer.active_subscriptions(), 1);
}

#[test]
fn each_subscriber_reads_its_own_iterator() {
  let producer = Arc::new(IteratorProducer::new(counting(4)));
  let first = CollectingConsumer::new();
  let second = CollectingConsumer::new();
  let first_subscription = subscribe(&producer, &first);
  let second_subscription = subscribe(&producer, &second);

  first_subscription.request(2).unwrap();
  second_subscription.request(2).unwrap();

  assert_eq!(first.events(), nexts(0..2));
  assert_eq!(second.events(), nexts(0..2));
  assert_ne!(*first_subscription, *second_subscription);
}

#[test]
fn cancel_from_on_next_stops_the_running_drain() {
  let producer = Arc::new(IteratorProducer::new(counting(100)));
  let consumer = CollectingConsumer::cancelling_after(2);
  let subscription = subscribe(&producer, &consumer);

  subscription.request(10).unwrap();

  assert_eq!(consumer.events(), nexts(0..2));
  assert!(subscription.is_terminated());
  assert_eq!(producer.active_subscriptions(), 0);
  assert_eq!(subscription.request(10), Ok(RequestOutcome::Ignored));
  assert_eq!(consumer.events().len(), 2);
}

#[test]
fn reentrant_requests_keep_the_default_drain_running() {
  let producer = Arc::new(IteratorProducer::new(counting(5)));
  let consumer = CollectingConsumer::requesting_one_per_item();
  let subscription = subscribe(&producer, &consumer);

  assert_eq!(subscription.request(1), Ok(RequestOutcome::Drained { amount: 1 }));

  let mut expected = nexts(0..5);
  expected.push(Event::Complete);
  assert_eq!(consumer.events(), expected);
  assert_eq!(subscription.config().demand_policy(), DemandPolicy::Accumulate);
}

#[test]
fn reentrant_requests_under_replace_include_the_item_in_delivery() {
  let producer = Arc::new(IteratorProducer::with_config(counting(5), SubscriptionConfig::new(DemandPolicy::Replace)));
  let consumer = CollectingConsumer::requesting_two_per_item();
  let subscription = subscribe(&producer, &consumer);

  subscription.request(1).unwrap();

  let mut expected = nexts(0..5);
  expected.push(Event::Complete);
  assert_eq!(consumer.events(), expected);
}

#[test]
fn request_after_completion_is_ignored() {
  let producer = Arc::new(IteratorProducer::new(counting(3)));
  let consumer = CollectingConsumer::new();
  let subscription = subscribe(&producer, &consumer);

  subscription.request(3).unwrap();

  assert!(subscription.is_terminated());
  assert_eq!(subscription.request(2), Ok(RequestOutcome::Ignored));
  let mut expected = nexts(0..3);
  expected.push(Event::Complete);
  assert_eq!(consumer.events(), expected);
}

#[test]
fn request_after_source_error_is_ignored() {
  let config = SubscriptionConfig::new(DemandPolicy::Replace);
  let producer =
    Arc::new(IteratorProducer::with_config(|| vec![Ok(1_u32), Err(StreamError::Failed)].into_iter(), config));
  let consumer = CollectingConsumer::new();
  let subscription = subscribe(&producer, &consumer);

  subscription.request(1).unwrap();
  subscription.request(1).unwrap();

  assert!(subscription.is_terminated());
  assert_eq!(subscription.request(5), Ok(RequestOutcome::Ignored));
  assert_eq!(consumer.events(), vec![Event::Next(1), Event::Error(StreamError::Failed)]);
}

#[test]
fn cancel_after_completion_signals_nothing_more() {
  let producer = Arc::new(IteratorProducer::new(counting(1)));
  let consumer = CollectingConsumer::new();
  let subscription = subscribe(&producer, &consumer);

  subscription.request(1).unwrap();
  subscription.cancel();

  assert_eq!(consumer.events(), vec![Event::Next(0), Event::Complete]);
  assert_eq!(producer.active_subscriptions(), 0);
}

#[test]
fn remove_subscription_is_idempotent() {
  let producer = Arc::new(IteratorProducer::new(counting(5)));
  let consumer = CollectingConsumer::new();
  let subscription = subscribe(&producer, &consumer);
  let key = subscription.key();

  subscription.cancel();
  Producer::<u32>::remove_subscription(&*producer, &key);
  subscription.cancel();

  assert!(!producer.is_active(&key));
  assert_eq!(producer.active_subscriptions(), 0);
}
