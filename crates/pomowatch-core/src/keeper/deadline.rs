use serde::{Deserialize, Serialize};

use crate::channel::{CompletionSignal, KeeperStatus};
use crate::timer::{IntervalDurations, IntervalId, TimerMode};

/// Keeper-side authoritative schedule.
///
/// Pure state: every operation takes the current wall time, so the same
/// logic runs inside the keeper task and in tests with a manual clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundDeadline {
    durations: IntervalDurations,
    is_active: bool,
    started_at_ms: Option<u64>,
    expires_at_ms: Option<u64>,
    mode: TimerMode,
    /// Armed duration. While active this is the length the deadline was
    /// started with; while paused it is what was left at pause time.
    duration_ms: u64,
    interval_id: Option<IntervalId>,
    last_completed: Option<CompletionSignal>,
}

impl BackgroundDeadline {
    pub fn new(durations: IntervalDurations) -> Self {
        Self {
            durations,
            is_active: false,
            started_at_ms: None,
            expires_at_ms: None,
            mode: TimerMode::Work,
            duration_ms: durations.ms(TimerMode::Work),
            interval_id: None,
            last_completed: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    pub fn expires_at_ms(&self) -> Option<u64> {
        self.expires_at_ms
    }

    pub fn interval_id(&self) -> Option<IntervalId> {
        self.interval_id
    }

    pub fn last_completed(&self) -> Option<&CompletionSignal> {
        self.last_completed.as_ref()
    }

    pub fn start(&mut self, mode: TimerMode, duration_ms: u64, interval_id: IntervalId, now_ms: u64) {
        self.is_active = true;
        self.started_at_ms = Some(now_ms);
        self.expires_at_ms = Some(now_ms.saturating_add(duration_ms));
        self.mode = mode;
        self.duration_ms = duration_ms;
        self.interval_id = Some(interval_id);
    }

    /// Stop the deadline, keeping what was left. Idempotent.
    pub fn pause(&mut self, now_ms: u64) {
        if !self.is_active {
            return;
        }
        self.duration_ms = self.remaining_ms(now_ms);
        self.is_active = false;
        self.started_at_ms = None;
        self.expires_at_ms = None;
    }

    /// Arm mode and duration without running.
    pub fn reset(&mut self, mode: TimerMode, duration_ms: u64, interval_id: IntervalId) {
        self.is_active = false;
        self.started_at_ms = None;
        self.expires_at_ms = None;
        self.mode = mode;
        self.duration_ms = duration_ms;
        self.interval_id = Some(interval_id);
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        match self.expires_at_ms {
            Some(expires) => expires.saturating_sub(now_ms),
            None => self.duration_ms,
        }
    }

    pub fn status(&self, now_ms: u64) -> KeeperStatus {
        KeeperStatus {
            is_active: self.is_active,
            mode: self.mode,
            interval_id: self.interval_id,
            remaining_ms: self.remaining_ms(now_ms),
            now_ms,
            last_completed: self.last_completed.clone(),
        }
    }

    /// One poll step. On expiry the deadline goes inactive, arms the
    /// successor mode at its nominal length, and yields the signal to
    /// broadcast. Never auto-continues.
    pub fn poll(&mut self, now_ms: u64) -> Option<CompletionSignal> {
        if !self.is_active {
            return None;
        }
        let expires = self.expires_at_ms?;
        if now_ms < expires {
            return None;
        }

        let completed_mode = self.mode;
        let next_mode = completed_mode.other();
        let next_duration_ms = self.durations.ms(next_mode);
        let signal = CompletionSignal {
            interval_id: self.interval_id.unwrap_or(IntervalId(0)),
            completed_mode,
            next_mode,
            next_duration_ms,
        };

        self.is_active = false;
        self.started_at_ms = None;
        self.expires_at_ms = None;
        self.mode = next_mode;
        self.duration_ms = next_duration_ms;
        self.interval_id = None;
        self.last_completed = Some(signal.clone());
        Some(signal)
    }
}
