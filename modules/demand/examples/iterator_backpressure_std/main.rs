//! A slow consumer pulling a numeric source in batches of four.
//!
//! Run with `RUST_LOG=fraktor::demand=trace` to see drain ownership hand-offs.

use std::{
  sync::{Arc, Mutex, mpsc},
  thread,
  time::Duration,
};

use fraktor_demand_rs::core::{Consumer, ConsumerId, IteratorProducer, StreamError, Subscription};
use tracing_subscriber::EnvFilter;

const BATCH: i64 = 4;

enum Signal {
  BatchDone,
  Finished,
}

struct BatchingConsumer {
  id:       ConsumerId,
  received: Mutex<i64>,
  signals:  Mutex<mpsc::Sender<Signal>>,
}

impl BatchingConsumer {
  fn signal(&self, signal: Signal) {
    if let Err(error) = self.signals.lock().expect("signal lock").send(signal) {
      tracing::warn!(%error, "requester stopped listening");
    }
  }
}

impl Consumer<u64> for BatchingConsumer {
  fn id(&self) -> ConsumerId {
    self.id
  }

  fn on_subscribe(&self, subscription: &Arc<Subscription<u64>>) {
    println!("subscribed: {subscription}");
  }

  fn on_next(&self, item: u64) {
    thread::sleep(Duration::from_millis(5));
    println!("received {item}");
    let mut received = self.received.lock().expect("counter lock");
    *received += 1;
    if *received % BATCH == 0 {
      drop(received);
      self.signal(Signal::BatchDone);
    }
  }

  fn on_complete(&self) {
    println!("source exhausted");
    self.signal(Signal::Finished);
  }

  fn on_error(&self, error: StreamError) {
    println!("source failed: {error}");
    self.signal(Signal::Finished);
  }
}

fn main() {
  tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

  let producer = Arc::new(IteratorProducer::new(|| (0..10_u64).map(Ok::<u64, StreamError>)));

  let (signals, batches) = mpsc::channel();
  let consumer: Arc<dyn Consumer<u64>> =
    Arc::new(BatchingConsumer { id: ConsumerId::next(), received: Mutex::new(0), signals: Mutex::new(signals) });
  let subscription = producer.subscribe(&consumer).expect("first subscription");

  let requester = {
    let subscription = subscription.clone();
    thread::spawn(move || {
      subscription.request(BATCH).expect("positive demand");
      while let Ok(Signal::BatchDone) = batches.recv() {
        let outcome = subscription.request(BATCH).expect("positive demand");
        println!("requested {BATCH} more: {outcome:?}");
      }
    })
  };

  requester.join().expect("requester thread");
  println!("active subscriptions: {}", producer.active_subscriptions());
}
