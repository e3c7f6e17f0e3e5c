//! Subscription protocol error definitions.


/// Errors produced synchronously by [`Subscription`](super::Subscription) operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum SubscriptionError {
  /// The requested element count was zero or negative.
  #[error("invalid demand request: {requested} (must be greater than zero)")]
  InvalidDemand {
    /// Element count passed by the caller.
    requested: i64,
  },
}
