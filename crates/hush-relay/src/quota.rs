//! Per-identity confession quota.
//!
//! [`QuotaTracker`] is a plain value type with no locking of its own. It
//! lives inside [`BotState`](crate::state::BotState) and is therefore only
//! reachable while the [`StateGuard`](crate::state::StateGuard) is held,
//! which is what makes [`QuotaTracker::check_and_increment`] atomic.

use std::collections::HashMap;

use hush_types::IdentityKey;

use crate::error::{RelayError, RelayResult};

/// Result of a quota check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The increment was applied.
    Allowed { used: u32, remaining: u32 },
    /// The identity is at or above the ceiling; nothing was changed.
    Denied { used: u32, max_allowed: u32 },
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Usage counts keyed by identity, bounded by a configurable ceiling.
#[derive(Clone, Debug)]
pub struct QuotaTracker {
    table: HashMap<IdentityKey, u32>,
    max_allowed: u32,
}

impl QuotaTracker {
    /// Create an empty tracker. `max_allowed` must be at least 1.
    pub fn new(max_allowed: u32) -> RelayResult<Self> {
        validate_ceiling(max_allowed)?;
        Ok(Self {
            table: HashMap::new(),
            max_allowed,
        })
    }

    /// Increment the usage of `key` unless it already reached the ceiling.
    ///
    /// Absent keys count as zero; entries are created on the first allowed
    /// increment only.
    pub fn check_and_increment(&mut self, key: IdentityKey) -> QuotaDecision {
        let used = self.usage(&key);
        if used >= self.max_allowed {
            return QuotaDecision::Denied {
                used,
                max_allowed: self.max_allowed,
            };
        }
        let used = used + 1;
        self.table.insert(key, used);
        QuotaDecision::Allowed {
            used,
            remaining: self.max_allowed - used,
        }
    }

    /// Forget every identity's usage. The ceiling is unchanged.
    pub fn reset(&mut self) {
        self.table.clear();
    }

    /// Replace the ceiling.
    ///
    /// Existing counts are left alone, so lowering the ceiling below a
    /// user's count denies them from now on without revoking past posts.
    pub fn set_max(&mut self, max_allowed: u32) -> RelayResult<()> {
        validate_ceiling(max_allowed)?;
        self.max_allowed = max_allowed;
        Ok(())
    }

    pub fn max_allowed(&self) -> u32 {
        self.max_allowed
    }

    /// Current count for `key`, zero if never seen.
    pub fn usage(&self, key: &IdentityKey) -> u32 {
        self.table.get(key).copied().unwrap_or(0)
    }

    /// Number of identities with at least one accepted confession.
    pub fn tracked_identities(&self) -> usize {
        self.table.len()
    }
}

fn validate_ceiling(max_allowed: u32) -> RelayResult<()> {
    if max_allowed == 0 {
        return Err(RelayError::InvalidArgument(
            "the confession limit must be at least 1".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(n: u8) -> IdentityKey {
        IdentityKey::from_digest([n; 32])
    }

    #[test]
    fn absent_key_starts_at_zero() {
        let tracker = QuotaTracker::new(2).unwrap();
        assert_eq!(tracker.usage(&key(1)), 0);
        assert_eq!(tracker.tracked_identities(), 0);
    }

    #[test]
    fn allows_up_to_ceiling_then_denies() {
        let mut tracker = QuotaTracker::new(2).unwrap();
        assert_eq!(
            tracker.check_and_increment(key(1)),
            QuotaDecision::Allowed {
                used: 1,
                remaining: 1,
            }
        );
        assert_eq!(
            tracker.check_and_increment(key(1)),
            QuotaDecision::Allowed {
                used: 2,
                remaining: 0,
            }
        );
        assert_eq!(
            tracker.check_and_increment(key(1)),
            QuotaDecision::Denied {
                used: 2,
                max_allowed: 2,
            }
        );
        assert_eq!(tracker.usage(&key(1)), 2);
    }

    #[test]
    fn identities_are_independent() {
        let mut tracker = QuotaTracker::new(1).unwrap();
        assert!(tracker.check_and_increment(key(1)).is_allowed());
        assert!(tracker.check_and_increment(key(2)).is_allowed());
        assert!(!tracker.check_and_increment(key(1)).is_allowed());
        assert_eq!(tracker.tracked_identities(), 2);
    }

    #[test]
    fn reset_restores_denied_identity() {
        let mut tracker = QuotaTracker::new(1).unwrap();
        tracker.check_and_increment(key(1));
        assert!(!tracker.check_and_increment(key(1)).is_allowed());
        tracker.reset();
        assert!(tracker.check_and_increment(key(1)).is_allowed());
        assert_eq!(tracker.max_allowed(), 1);
    }

    #[test]
    fn lowering_ceiling_keeps_existing_counts() {
        let mut tracker = QuotaTracker::new(5).unwrap();
        for _ in 0..3 {
            tracker.check_and_increment(key(1));
        }
        tracker.set_max(1).unwrap();
        assert_eq!(
            tracker.check_and_increment(key(1)),
            QuotaDecision::Denied {
                used: 3,
                max_allowed: 1,
            }
        );
        assert_eq!(tracker.usage(&key(1)), 3);
    }

    #[test]
    fn zero_ceiling_is_rejected() {
        assert!(matches!(QuotaTracker::new(0), Err(RelayError::InvalidArgument(_))));
        let mut tracker = QuotaTracker::new(3).unwrap();
        assert!(tracker.set_max(0).is_err());
        assert_eq!(tracker.max_allowed(), 3);
    }

    proptest! {
        #[test]
        fn allowed_count_is_min_of_attempts_and_ceiling(max in 1u32..20, attempts in 0usize..60) {
            let mut tracker = QuotaTracker::new(max).unwrap();
            let allowed = (0..attempts)
                .filter(|_| tracker.check_and_increment(key(9)).is_allowed())
                .count();
            prop_assert_eq!(allowed, attempts.min(max as usize));
            prop_assert!(tracker.usage(&key(9)) <= max);
        }
    }
}
