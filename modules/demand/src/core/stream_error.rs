//! Stream error definitions.


/// Errors raised by producers and registries, outside the subscription protocol itself.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum StreamError {
  /// The producer's source failed while generating an item.
  #[error("stream failed")]
  Failed,
  /// The (producer, consumer) pair is already registered.
  #[error("subscription already registered")]
  DuplicateSubscription,
}
