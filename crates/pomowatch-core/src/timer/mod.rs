mod engine;
mod guard;
mod mode;

pub use engine::{Phase, RunGeneration, TimerCore, TimerState};
pub use guard::{CompletionGuard, IntervalId};
pub use mode::{format_clock, IntervalDurations, TimerMode};
