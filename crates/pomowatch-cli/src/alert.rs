//! Terminal notification for completed intervals.

use std::io::Write;

use pomowatch_core::{
    AlertDispatcher, AlertError, AlertMessage, IntervalDurations, SoundProfile, TimerMode,
};

/// Rings the terminal bell in the configured sound pattern and prints the
/// completion message on stderr.
pub struct TerminalAlert {
    durations: IntervalDurations,
    sound: SoundProfile,
    bell: bool,
}

impl TerminalAlert {
    pub fn new(durations: IntervalDurations, sound: SoundProfile, bell: bool) -> Self {
        Self {
            durations,
            sound,
            bell,
        }
    }

    /// One BEL per tone of the profile. The terminal has no pitch, so only
    /// the tone count survives.
    fn chime(&self) -> String {
        if self.bell {
            "\x07".repeat(self.sound.repeat())
        } else {
            String::new()
        }
    }

    fn render(&self, completed: TimerMode) -> String {
        let message = AlertMessage::for_completion(completed, &self.durations);
        format!("{}{}: {}", self.chime(), message.title, message.body)
    }
}

impl AlertDispatcher for TerminalAlert {
    fn dispatch(&self, completed: TimerMode) -> Result<(), AlertError> {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "{}", self.render(completed))?;
        stderr.flush()?;
        Ok(())
    }
}
