/// Collaborator interface for items, completion and failure delivery.
mod consumer;
/// Consumer identifier type.
mod consumer_id;
/// Atomic demand counter.
mod demand_counter;
/// Demand accumulation policy.
mod demand_policy;
/// Reference producer backed by an iterator factory.
mod iterator_producer;
/// Collaborator interface for drain passes and unregistration.
mod producer;
/// Producer identifier type.
mod producer_id;
/// Outcome of a demand request.
mod request_outcome;
/// Collaborator-level stream errors.
mod stream_error;
/// Producer/consumer subscription protocol.
mod subscription;
/// Subscription configuration.
mod subscription_config;
/// Subscription protocol errors.
mod subscription_error;
/// Subscription identity key.
mod subscription_key;
/// Keyed subscription registry.
mod subscription_registry;

pub use consumer::Consumer;
pub use consumer_id::ConsumerId;
pub use demand_counter::DemandCounter;
pub use demand_policy::DemandPolicy;
pub use iterator_producer::IteratorProducer;
pub use producer::Producer;
pub use producer_id::ProducerId;
pub use request_outcome::RequestOutcome;
pub use stream_error::StreamError;
pub use subscription::Subscription;
pub use subscription_config::SubscriptionConfig;
pub use subscription_error::SubscriptionError;
pub use subscription_key::SubscriptionKey;
pub use subscription_registry::SubscriptionRegistry;

/// Target used by every `tracing` event emitted from this crate.
pub(crate) const LOG_TARGET: &str = "fraktor::demand";
