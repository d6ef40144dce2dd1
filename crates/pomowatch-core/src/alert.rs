//! Alert capability consumed by the core.
//!
//! Sound, notification and haptic output live outside the engine. The core
//! only needs a fire-and-forget `dispatch` and a guarantee that whatever
//! happens inside it (an error, a panic) stays inside it.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AlertError;
use crate::timer::{IntervalDurations, TimerMode};

pub trait AlertDispatcher: Send {
    /// Announce that an interval of `completed` mode just finished.
    ///
    /// Must return promptly; anything slow belongs on another thread.
    fn dispatch(&self, completed: TimerMode) -> Result<(), AlertError>;
}

/// Dispatcher that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAlert;

impl AlertDispatcher for NoopAlert {
    fn dispatch(&self, _completed: TimerMode) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Call `alert`, absorbing errors and panics. Returns whether it succeeded.
pub fn dispatch_guarded(alert: &dyn AlertDispatcher, completed: TimerMode) -> bool {
    match catch_unwind(AssertUnwindSafe(|| alert.dispatch(completed))) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!(mode = %completed, error = %e, "alert dispatch failed");
            false
        }
        Err(_) => {
            warn!(mode = %completed, "alert dispatcher panicked");
            false
        }
    }
}

/// Named completion sound. Each profile is played as a short burst of
/// `repeat` tones spaced `gap_ms` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundProfile {
    #[default]
    Beep,
    Bell,
    Chime,
    Ding,
    Success,
}

impl SoundProfile {
    pub const NAMES: [&'static str; 5] = ["beep", "bell", "chime", "ding", "success"];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beep" => Some(SoundProfile::Beep),
            "bell" => Some(SoundProfile::Bell),
            "chime" => Some(SoundProfile::Chime),
            "ding" => Some(SoundProfile::Ding),
            "success" => Some(SoundProfile::Success),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SoundProfile::Beep => "beep",
            SoundProfile::Bell => "bell",
            SoundProfile::Chime => "chime",
            SoundProfile::Ding => "ding",
            SoundProfile::Success => "success",
        }
    }

    /// Number of tones in the burst.
    pub fn repeat(self) -> usize {
        match self {
            SoundProfile::Beep | SoundProfile::Bell => 1,
            SoundProfile::Chime | SoundProfile::Ding => 2,
            SoundProfile::Success => 3,
        }
    }

    pub fn gap_ms(self) -> u64 {
        match self {
            SoundProfile::Beep | SoundProfile::Bell => 0,
            SoundProfile::Chime => 200,
            SoundProfile::Ding => 150,
            SoundProfile::Success => 100,
        }
    }
}

impl std::fmt::Display for SoundProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing text for a completion notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub title: String,
    pub body: String,
}

impl AlertMessage {
    pub fn for_completion(completed: TimerMode, durations: &IntervalDurations) -> Self {
        match completed {
            TimerMode::Work => Self {
                title: "Break Time!".into(),
                body: format!(
                    "Great job! Time for a {}-minute break.",
                    durations.break_minutes
                ),
            },
            TimerMode::Break => Self {
                title: "Back to Work!".into(),
                body: format!(
                    "Break's over! Time for a {}-minute work session.",
                    durations.work_minutes
                ),
            },
        }
    }
}
