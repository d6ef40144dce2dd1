use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{IntervalId, Phase, TimerMode};

/// Which detector noticed that an interval ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionSource {
    /// The foreground countdown reached zero.
    LocalTick,
    /// A completion broadcast from the keeper.
    KeeperSignal,
    /// A status query on resume showed the deadline had passed.
    Reconciliation,
}

/// Every state change of the foreground core produces an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        interval_id: IntervalId,
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    IntervalCompleted {
        interval_id: IntervalId,
        completed_mode: TimerMode,
        next_mode: TimerMode,
        next_secs: u64,
        completed_intervals: u64,
        source: CompletionSource,
        at: DateTime<Utc>,
    },
    /// Local countdown was re-aligned to the keeper's deadline.
    DriftCorrected {
        from_secs: u64,
        to_secs: u64,
        at: DateTime<Utc>,
    },
    /// The keeper had lost the running deadline and was sent a fresh Start.
    KeeperRearmed {
        interval_id: IntervalId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        mode: TimerMode,
        remaining_secs: u64,
        display: String,
        completed_intervals: u64,
        interval_id: IntervalId,
        sessions: usize,
        at: DateTime<Utc>,
    },
}
