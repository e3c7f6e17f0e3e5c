/// What a successful [`Subscription::request`](super::Subscription::request) call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
  /// The caller became drain owner and ran a drain pass before returning.
  Drained {
    /// Demand read when the pass started. Later requests may change it while the pass runs.
    amount: u64,
  },
  /// A drain pass was already in flight; only the shared demand was updated.
  Pending {
    /// Demand value right after the update.
    demand: i64,
  },
  /// The subscription was cancelled or finished, or its collaborators are gone; nothing happened.
  Ignored,
}

impl RequestOutcome {
  /// Returns `true` when the call ran a drain pass.
  #[must_use]
  pub const fn is_drained(&self) -> bool {
    matches!(self, Self::Drained { .. })
  }
}
