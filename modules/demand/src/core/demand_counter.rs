//! Atomic demand counter shared by requesters and the drain owner.


use core::sync::atomic::Ordering;

use portable_atomic::AtomicI64;

use super::DemandPolicy;

/// Lock-free demand counter.
///
/// The counter starts at [`DemandCounter::UNREQUESTED`]. Requesters move it to a positive value
/// through [`grant`](Self::grant); the drain owner lowers it through [`consume`](Self::consume).
/// A value at or below zero means no drain pass is in flight.
#[derive(Debug)]
pub struct DemandCounter {
  value:  AtomicI64,
  policy: DemandPolicy,
}

impl DemandCounter {
  /// Sentinel meaning no request has ever been made.
  pub const UNREQUESTED: i64 = -1;

  /// Creates a counter holding the [`UNREQUESTED`](Self::UNREQUESTED) sentinel.
  #[must_use]
  pub const fn new(policy: DemandPolicy) -> Self {
    Self { value: AtomicI64::new(Self::UNREQUESTED), policy }
  }

  /// Returns the policy applied by [`grant`](Self::grant).
  #[must_use]
  pub const fn policy(&self) -> DemandPolicy {
    self.policy
  }

  /// Returns the current demand value.
  #[must_use]
  pub fn current(&self) -> i64 {
    self.value.load(Ordering::Acquire)
  }

  /// Returns `true` while no request has ever been granted.
  #[must_use]
  pub fn is_unrequested(&self) -> bool {
    self.current() == Self::UNREQUESTED
  }

  /// Applies a strictly positive request and returns the previous value.
  ///
  /// Exactly one caller observes a previous value at or below zero per drain cycle; that caller
  /// owns the next drain pass.
  pub fn grant(&self, elements: i64) -> i64 {
    debug_assert!(elements > 0);
    match self.policy {
      | DemandPolicy::Replace => self.value.swap(elements, Ordering::AcqRel),
      | DemandPolicy::Accumulate => {
        let mut current = self.value.load(Ordering::Acquire);
        loop {
          let next = if current <= 0 { elements } else { current.saturating_add(elements) };
          match self.value.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire) {
            | Ok(previous) => return previous,
            | Err(observed) => current = observed,
          }
        }
      },
    }
  }

  /// Lowers the demand by `produced`, clamped at zero, and returns the remaining demand.
  ///
  /// Values at or below zero, including the sentinel, are left untouched. A return value of zero
  /// hands drain ownership back to the next requester.
  pub fn consume(&self, produced: u64) -> i64 {
    let produced = i64::try_from(produced).unwrap_or(i64::MAX);
    let mut current = self.value.load(Ordering::Acquire);
    loop {
      if current <= 0 {
        return current;
      }
      let next = current.saturating_sub(produced).max(0);
      match self.value.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire) {
        | Ok(_) => return next,
        | Err(observed) => current = observed,
      }
    }
  }
}

impl Default for DemandCounter {
  fn default() -> Self {
    Self::new(DemandPolicy::default())
  }
}
