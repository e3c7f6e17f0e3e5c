/// How a new request combines with demand that has not been consumed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemandPolicy {
  /// The new request overwrites the outstanding demand.
  ///
  /// The item a drain is currently delivering still counts as outstanding, so a consumer that
  /// requests from inside `on_next` has to include that item in the new value.
  Replace,
  /// The new request is added to the outstanding demand, saturating at `i64::MAX`.
  #[default]
  Accumulate,
}

impl DemandPolicy {
  /// Returns `true` when requests are summed rather than overwritten.
  #[must_use]
  pub const fn is_accumulating(self) -> bool {
    matches!(self, Self::Accumulate)
  }
}
