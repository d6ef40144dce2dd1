use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Work,
    Break,
}

impl TimerMode {
    /// The mode that follows this one. Work and Break strictly alternate.
    pub fn other(self) -> Self {
        match self {
            TimerMode::Work => TimerMode::Break,
            TimerMode::Break => TimerMode::Work,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::Break => "break",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "focus" => Some(TimerMode::Work),
            "break" | "rest" => Some(TimerMode::Break),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nominal interval lengths, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalDurations {
    pub work_minutes: u64,
    pub break_minutes: u64,
}

impl IntervalDurations {
    pub fn new(work_minutes: u64, break_minutes: u64) -> Self {
        Self {
            work_minutes,
            break_minutes,
        }
    }

    pub fn minutes(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::Break => self.break_minutes,
        }
    }

    /// Nominal duration in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn secs(&self, mode: TimerMode) -> u64 {
        self.minutes(mode).saturating_mul(60)
    }

    /// Nominal duration in milliseconds.
    pub fn ms(&self, mode: TimerMode) -> u64 {
        self.secs(mode).saturating_mul(1000)
    }
}

impl Default for IntervalDurations {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
        }
    }
}

/// Format whole seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
