//! Completion guard (dedup token).
//!
//! Both the foreground tick and the keeper can observe the same expiry, and
//! the keeper's broadcast may arrive long after the foreground moved on. The
//! guard records the most recent interval whose completion was processed so
//! that every later signal for it, or for any older interval, is rejected.

use serde::{Deserialize, Serialize};

/// Identifier of one logical interval. Strictly increasing for the lifetime
/// of a `TimerCore`; a reset or mode switch starts a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalId(pub u64);

impl IntervalId {
    pub fn next(self) -> Self {
        IntervalId(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for IntervalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionGuard {
    id: IntervalId,
    recorded: bool,
}

impl CompletionGuard {
    pub fn new(id: IntervalId) -> Self {
        Self {
            id,
            recorded: false,
        }
    }

    pub fn id(&self) -> IntervalId {
        self.id
    }

    pub fn recorded(&self) -> bool {
        self.recorded
    }

    /// True if a completion for `id` has already been processed.
    pub fn is_recorded(&self, id: IntervalId) -> bool {
        id < self.id || (id == self.id && self.recorded)
    }

    /// Claim the completion of `id`. Returns `false` if it was already
    /// claimed (or superseded), in which case nothing must be recorded.
    pub fn try_claim(&mut self, id: IntervalId) -> bool {
        if self.is_recorded(id) {
            return false;
        }
        self.id = id;
        self.recorded = true;
        true
    }

    /// Start tracking a fresh interval with nothing recorded.
    pub fn clear(&mut self, id: IntervalId) {
        self.id = id;
        self.recorded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_single_shot() {
        let mut guard = CompletionGuard::new(IntervalId(1));
        assert!(guard.try_claim(IntervalId(1)));
        assert!(!guard.try_claim(IntervalId(1)));
        assert!(guard.is_recorded(IntervalId(1)));
    }

    #[test]
    fn older_intervals_are_rejected() {
        let mut guard = CompletionGuard::new(IntervalId(1));
        assert!(guard.try_claim(IntervalId(3)));
        assert!(!guard.try_claim(IntervalId(2)));
        assert!(guard.try_claim(IntervalId(4)));
    }

    #[test]
    fn clear_opens_a_new_interval() {
        let mut guard = CompletionGuard::new(IntervalId(1));
        guard.try_claim(IntervalId(1));
        guard.clear(IntervalId(2));
        assert!(!guard.recorded());
        assert!(!guard.is_recorded(IntervalId(2)));
        assert!(guard.is_recorded(IntervalId(1)));
    }
}
