//! In-memory session log.
//!
//! One immutable record per completed interval, kept in completion order.
//! The foreground core owns the only log; the keeper never sees it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::timer::TimerMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub occurred_at: DateTime<Utc>,
    pub mode: TimerMode,
    pub duration_minutes: u64,
}

/// Append-only log of completed intervals, oldest first.
#[derive(Debug, Clone, Default)]
pub struct SessionRecorder {
    records: Vec<SessionRecord>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mode: TimerMode, duration_minutes: u64, occurred_at: DateTime<Utc>) {
        self.records.push(SessionRecord {
            occurred_at,
            mode,
            duration_minutes,
        });
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total nominal minutes of completed work intervals.
    pub fn work_minutes(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| r.mode == TimerMode::Work)
            .map(|r| r.duration_minutes)
            .sum()
    }
}

/// Persistence capability, used only at the edges, never inside a timer
/// transition.
pub trait SessionStore {
    /// Append `sessions` after whatever is already stored. Rows written or
    /// removed by other handles are left alone.
    fn save(&mut self, sessions: &[SessionRecord]) -> Result<()>;

    /// Load the stored log, oldest first.
    fn load(&self) -> Result<Vec<SessionRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn preserves_insertion_order() {
        let base = Utc::now();
        let mut log = SessionRecorder::new();
        log.record(TimerMode::Work, 25, base);
        log.record(TimerMode::Break, 5, base + Duration::minutes(25));
        log.record(TimerMode::Work, 25, base + Duration::minutes(30));

        let modes: Vec<_> = log.sessions().iter().map(|r| r.mode).collect();
        assert_eq!(modes, vec![TimerMode::Work, TimerMode::Break, TimerMode::Work]);
        assert_eq!(log.sessions()[0].occurred_at, base);
        assert_eq!(log.work_minutes(), 50);
    }

    #[test]
    fn clear_empties_log() {
        let mut log = SessionRecorder::new();
        log.record(TimerMode::Work, 25, Utc::now());
        assert_eq!(log.len(), 1);
        log.clear();
        assert!(log.is_empty());
    }
}
