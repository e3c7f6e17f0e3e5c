use super::DemandPolicy;


/// Configuration applied to a [`Subscription`](super::Subscription) at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionConfig {
  demand_policy: DemandPolicy,
}

impl SubscriptionConfig {
  /// Creates a configuration with the provided demand policy.
  #[must_use]
  pub const fn new(demand_policy: DemandPolicy) -> Self {
    Self { demand_policy }
  }

  /// Returns the configured demand policy.
  #[must_use]
  pub const fn demand_policy(&self) -> DemandPolicy {
    self.demand_policy
  }

  /// Updates the demand policy.
  #[must_use]
  pub const fn with_demand_policy(mut self, demand_policy: DemandPolicy) -> Self {
    self.demand_policy = demand_policy;
    self
  }
}

impl Default for SubscriptionConfig {
  fn default() -> Self {
    Self { demand_policy: DemandPolicy::Accumulate }
  }
}
