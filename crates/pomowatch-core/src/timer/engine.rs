//! Foreground timer core.
//!
//! A second-granularity state machine that is ticked by its host once per
//! second. It mirrors every command to the background keeper, which keeps an
//! independent wall-clock deadline. Completion may be detected by the local
//! tick, by a keeper broadcast, or by a status reconciliation on resume; the
//! completion guard makes sure each interval is recorded once.
//!
//! ## State Transitions
//!
//! ```text
//! Idle(mode) --start--> Running(mode) --tick to zero--> [expiring] --> Idle(other mode)
//!      ^                     |
//!      +-------pause---------+
//! reset / switch_mode: any --> Idle
//! ```
//!
//! Expiry never auto-continues: the next interval waits for `start`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::guard::{CompletionGuard, IntervalId};
use super::mode::{format_clock, IntervalDurations, TimerMode};
use crate::alert::{dispatch_guarded, AlertDispatcher};
use crate::channel::{CompletionSignal, KeeperCommand, KeeperLink, KeeperStatus};
use crate::clock::Clock;
use crate::events::{CompletionSource, Event};
use crate::session::{SessionRecord, SessionRecorder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
}

/// Counter bumped by every start, pause, reset, switch and completion.
/// A scheduled tick carrying an older generation is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunGeneration(pub u64);

/// Plain snapshot of the foreground countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_secs: u64,
    pub is_running: bool,
    pub mode: TimerMode,
    pub completed_intervals: u64,
    pub interval_id: IntervalId,
}

pub struct TimerCore {
    durations: IntervalDurations,
    mode: TimerMode,
    remaining_secs: u64,
    is_running: bool,
    completed_intervals: u64,
    interval_id: IntervalId,
    guard: CompletionGuard,
    generation: RunGeneration,
    drift_tolerance_secs: u64,
    recorder: SessionRecorder,
    link: Box<dyn KeeperLink>,
    alert: Box<dyn AlertDispatcher>,
    clock: Arc<dyn Clock>,
}

impl TimerCore {
    /// Create an idle core in Work mode with the full work duration.
    pub fn new(
        durations: IntervalDurations,
        link: Box<dyn KeeperLink>,
        alert: Box<dyn AlertDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let interval_id = IntervalId(1);
        Self {
            durations,
            mode: TimerMode::Work,
            remaining_secs: durations.secs(TimerMode::Work),
            is_running: false,
            completed_intervals: 0,
            interval_id,
            guard: CompletionGuard::new(interval_id),
            generation: RunGeneration(0),
            drift_tolerance_secs: 2,
            recorder: SessionRecorder::new(),
            link,
            alert,
            clock,
        }
    }

    /// Difference between local and keeper countdowns tolerated before the
    /// local one is re-aligned.
    pub fn with_drift_tolerance(mut self, secs: u64) -> Self {
        self.drift_tolerance_secs = secs;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn phase(&self) -> Phase {
        if self.is_running {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    pub fn completed_intervals(&self) -> u64 {
        self.completed_intervals
    }

    pub fn interval_id(&self) -> IntervalId {
        self.interval_id
    }

    pub fn generation(&self) -> RunGeneration {
        self.generation
    }

    pub fn guard(&self) -> &CompletionGuard {
        &self.guard
    }

    pub fn durations(&self) -> &IntervalDurations {
        &self.durations
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        self.recorder.sessions()
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn clear_sessions(&mut self) {
        self.recorder.clear();
    }

    /// `MM:SS` of the remaining time.
    pub fn display_time(&self) -> String {
        format_clock(self.remaining_secs)
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            remaining_secs: self.remaining_secs,
            is_running: self.is_running,
            mode: self.mode,
            completed_intervals: self.completed_intervals,
            interval_id: self.interval_id,
        }
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase(),
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            display: self.display_time(),
            completed_intervals: self.completed_intervals,
            interval_id: self.interval_id,
            sessions: self.recorder.len(),
            at: self.clock.now_utc(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.is_running {
            return None;
        }
        if self.remaining_secs == 0 {
            self.remaining_secs = self.durations.secs(self.mode);
        }
        self.is_running = true;
        self.bump_generation();
        self.send(KeeperCommand::Start {
            mode: self.mode,
            duration_ms: self.remaining_secs.saturating_mul(1000),
            interval_id: self.interval_id,
        });
        info!(mode = %self.mode, remaining = %self.display_time(), interval_id = %self.interval_id, "timer started");
        Some(Event::TimerStarted {
            interval_id: self.interval_id,
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: self.clock.now_utc(),
        })
    }

    /// Stop counting, keeping the remaining time. Idempotent.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        self.bump_generation();
        self.send(KeeperCommand::Pause);
        info!(remaining = %self.display_time(), "timer paused");
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: self.clock.now_utc(),
        })
    }

    /// Back to the full nominal duration of the current mode.
    pub fn reset(&mut self) -> Option<Event> {
        self.begin_interval(self.mode);
        info!(mode = %self.mode, "timer reset");
        Some(Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: self.clock.now_utc(),
        })
    }

    /// Jump to the other mode without counting anything as completed.
    pub fn switch_mode(&mut self) -> Option<Event> {
        let from = self.mode;
        self.begin_interval(from.other());
        info!(%from, to = %self.mode, "mode switched");
        Some(Event::ModeSwitched {
            from,
            to: self.mode,
            remaining_secs: self.remaining_secs,
            at: self.clock.now_utc(),
        })
    }

    /// One second elapsed. No-op unless running.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return self.complete_interval(CompletionSource::LocalTick);
        }
        None
    }

    /// Tick delivered by a scheduled callback armed under `generation`.
    /// Callbacks that outlived a pause, reset or completion do nothing.
    pub fn scheduled_tick(&mut self, generation: RunGeneration) -> Option<Event> {
        if generation != self.generation {
            debug!(stale = generation.0, current = self.generation.0, "ignoring stale tick");
            return None;
        }
        self.tick()
    }

    /// Apply a completion broadcast from the keeper.
    pub fn handle_completion(&mut self, signal: &CompletionSignal) -> Option<Event> {
        self.accept_signal(signal, CompletionSource::KeeperSignal)
    }

    /// Compare against the keeper's view after the foreground regains
    /// control (resume, focus, wake-up) and resolve any discrepancy.
    pub fn reconcile(&mut self, status: &KeeperStatus) -> Option<Event> {
        if let Some(done) = &status.last_completed {
            if done.interval_id == self.interval_id && !self.guard.is_recorded(done.interval_id) {
                info!(interval_id = %done.interval_id, "recovering completion missed while away");
                return self.accept_signal(done, CompletionSource::Reconciliation);
            }
        }

        if !self.is_running {
            return None;
        }

        match status.interval_id {
            Some(id) if id == self.interval_id && status.is_active => {
                if status.remaining_ms == 0 {
                    info!(
                        local_remaining = self.remaining_secs,
                        "keeper deadline already passed, completing now"
                    );
                    return self.complete_interval(CompletionSource::Reconciliation);
                }
                let keeper_secs = status.remaining_ms.div_ceil(1000);
                if keeper_secs.abs_diff(self.remaining_secs) > self.drift_tolerance_secs {
                    let from_secs = self.remaining_secs;
                    self.remaining_secs = keeper_secs;
                    info!(from_secs, to_secs = keeper_secs, "local countdown re-aligned to keeper");
                    return Some(Event::DriftCorrected {
                        from_secs,
                        to_secs: keeper_secs,
                        at: self.clock.now_utc(),
                    });
                }
                None
            }
            _ => {
                warn!(
                    interval_id = %self.interval_id,
                    keeper_active = status.is_active,
                    "keeper lost the running deadline, re-arming"
                );
                self.send(KeeperCommand::Start {
                    mode: self.mode,
                    duration_ms: self.remaining_secs.saturating_mul(1000),
                    interval_id: self.interval_id,
                });
                Some(Event::KeeperRearmed {
                    interval_id: self.interval_id,
                    remaining_secs: self.remaining_secs,
                    at: self.clock.now_utc(),
                })
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn accept_signal(&mut self, signal: &CompletionSignal, source: CompletionSource) -> Option<Event> {
        if self.guard.is_recorded(signal.interval_id) {
            debug!(interval_id = %signal.interval_id, ?source, "completion already recorded");
            return None;
        }
        if signal.interval_id != self.interval_id {
            debug!(
                interval_id = %signal.interval_id,
                current = %self.interval_id,
                "completion for an abandoned interval"
            );
            return None;
        }
        if signal.completed_mode != self.mode {
            warn!(
                signal_mode = %signal.completed_mode,
                local_mode = %self.mode,
                "completion mode disagrees with local state, ignoring"
            );
            return None;
        }
        if self.remaining_secs > self.drift_tolerance_secs {
            warn!(
                local_remaining = self.remaining_secs,
                tolerance = self.drift_tolerance_secs,
                "keeper expired ahead of the local countdown"
            );
        }
        self.complete_interval(source)
    }

    /// The expiring step: alert, record, count, flip, stop.
    fn complete_interval(&mut self, source: CompletionSource) -> Option<Event> {
        let id = self.interval_id;
        if !self.guard.try_claim(id) {
            debug!(interval_id = %id, ?source, "completion already recorded");
            return None;
        }
        let completed = self.mode;
        self.remaining_secs = 0;

        dispatch_guarded(self.alert.as_ref(), completed);

        self.recorder.record(
            completed,
            self.durations.minutes(completed),
            self.clock.now_utc(),
        );
        if completed == TimerMode::Work {
            self.completed_intervals += 1;
        }

        self.mode = completed.other();
        self.remaining_secs = self.durations.secs(self.mode);
        self.is_running = false;
        self.bump_generation();
        self.interval_id = id.next();
        // Arm the keeper for the next interval; also disarms a deadline the
        // keeper has not yet noticed.
        self.send(KeeperCommand::Reset {
            mode: self.mode,
            duration_ms: self.durations.ms(self.mode),
            interval_id: self.interval_id,
        });

        info!(
            interval_id = %id,
            %completed,
            next = %self.mode,
            ?source,
            completed_intervals = self.completed_intervals,
            "interval completed"
        );
        Some(Event::IntervalCompleted {
            interval_id: id,
            completed_mode: completed,
            next_mode: self.mode,
            next_secs: self.remaining_secs,
            completed_intervals: self.completed_intervals,
            source,
            at: self.clock.now_utc(),
        })
    }

    fn begin_interval(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.remaining_secs = self.durations.secs(mode);
        self.is_running = false;
        self.bump_generation();
        self.interval_id = self.interval_id.next();
        self.guard.clear(self.interval_id);
        self.send(KeeperCommand::Reset {
            mode,
            duration_ms: self.durations.ms(mode),
            interval_id: self.interval_id,
        });
    }

    fn bump_generation(&mut self) {
        self.generation = RunGeneration(self.generation.0.wrapping_add(1));
    }

    fn send(&self, command: KeeperCommand) {
        let kind = command.kind();
        if let Err(e) = self.link.send(command) {
            warn!(command = kind, error = %e, "keeper command dropped, continuing on local countdown");
        }
    }
}

impl std::fmt::Debug for TimerCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerCore")
            .field("mode", &self.mode)
            .field("remaining_secs", &self.remaining_secs)
            .field("is_running", &self.is_running)
            .field("completed_intervals", &self.completed_intervals)
            .field("interval_id", &self.interval_id)
            .field("guard", &self.guard)
            .field("sessions", &self.recorder.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::NoopAlert;
    use crate::channel::DetachedLink;
    use crate::clock::ManualClock;
    use crate::error::{AlertError, LinkError};
    use std::sync::Mutex;

    /// Link that remembers the wire form of every command.
    #[derive(Clone, Default)]
    struct RecordingLink {
        sent: Arc<Mutex<Vec<crate::channel::WireMessage>>>,
    }

    impl KeeperLink for RecordingLink {
        fn send(&self, command: KeeperCommand) -> Result<(), LinkError> {
            self.sent.lock().unwrap().push(command.to_wire());
            Ok(())
        }
    }

    struct BrokenAlert;

    impl AlertDispatcher for BrokenAlert {
        fn dispatch(&self, _completed: TimerMode) -> Result<(), AlertError> {
            Err(AlertError::Failed("notification service down".into()))
        }
    }

    fn core() -> TimerCore {
        TimerCore::new(
            IntervalDurations::default(),
            Box::new(DetachedLink),
            Box::new(NoopAlert),
            Arc::new(ManualClock::new(1_700_000_000_000)),
        )
    }

    fn signal_for(core: &TimerCore) -> CompletionSignal {
        CompletionSignal {
            interval_id: core.interval_id(),
            completed_mode: core.mode(),
            next_mode: core.mode().other(),
            next_duration_ms: core.durations().ms(core.mode().other()),
        }
    }

    #[test]
    fn start_pause_start() {
        let mut timer = core();
        assert_eq!(timer.phase(), Phase::Idle);
        assert!(timer.start().is_some());
        assert!(timer.start().is_none());
        assert_eq!(timer.phase(), Phase::Running);
        assert!(timer.pause().is_some());
        assert!(timer.pause().is_none());
        assert_eq!(timer.phase(), Phase::Idle);
    }

    #[test]
    fn tick_decrements_by_one() {
        let mut timer = core();
        timer.start();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 1499);
        assert_eq!(timer.display_time(), "24:59");
    }

    #[test]
    fn full_work_interval_completes_once() {
        let mut timer = core();
        timer.start();
        let mut completions = 0;
        for _ in 0..1500 {
            if let Some(Event::IntervalCompleted { source, .. }) = timer.tick() {
                assert_eq!(source, CompletionSource::LocalTick);
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(timer.phase(), Phase::Idle);
        assert_eq!(timer.mode(), TimerMode::Break);
        assert_eq!(timer.remaining_secs(), 300);
        assert_eq!(timer.completed_intervals(), 1);
        assert_eq!(timer.sessions().len(), 1);
        assert_eq!(timer.sessions()[0].mode, TimerMode::Work);
        assert_eq!(timer.sessions()[0].duration_minutes, 25);
    }

    #[test]
    fn break_completion_does_not_count() {
        let mut timer = core();
        timer.switch_mode();
        timer.start();
        for _ in 0..300 {
            timer.tick();
        }
        assert_eq!(timer.mode(), TimerMode::Work);
        assert_eq!(timer.remaining_secs(), 1500);
        assert_eq!(timer.completed_intervals(), 0);
        assert_eq!(timer.sessions()[0].mode, TimerMode::Break);
        assert_eq!(timer.sessions()[0].duration_minutes, 5);
    }

    #[test]
    fn pause_ignores_stale_ticks_and_resumes_in_place() {
        let mut timer = core();
        timer.start();
        let armed = timer.generation();
        for _ in 0..10 {
            timer.scheduled_tick(armed);
        }
        assert_eq!(timer.display_time(), "24:50");

        timer.pause();
        for _ in 0..10 {
            assert!(timer.scheduled_tick(armed).is_none());
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.display_time(), "24:50");
        assert!(!timer.is_running());

        timer.start();
        assert_eq!(timer.display_time(), "24:50");
        // A tick armed before the pause is still stale after restarting.
        assert!(timer.scheduled_tick(armed).is_none());
        assert_eq!(timer.remaining_secs(), 1490);
    }

    #[test]
    fn reset_then_start_restores_nominal_duration() {
        let mut timer = core();
        timer.start();
        for _ in 0..42 {
            timer.tick();
        }
        timer.reset();
        timer.start();
        assert_eq!(timer.remaining_secs(), 1500);

        timer.switch_mode();
        timer.reset();
        timer.start();
        assert_eq!(timer.remaining_secs(), 300);
    }

    #[test]
    fn switch_and_reset_never_count() {
        let mut timer = core();
        timer.start();
        timer.switch_mode();
        timer.switch_mode();
        timer.reset();
        assert_eq!(timer.completed_intervals(), 0);
        assert!(timer.sessions().is_empty());
    }

    #[test]
    fn signal_after_local_expiry_is_ignored() {
        let mut timer = core();
        timer.start();
        let signal = signal_for(&timer);
        for _ in 0..1500 {
            timer.tick();
        }
        assert!(timer.handle_completion(&signal).is_none());
        assert_eq!(timer.sessions().len(), 1);
        assert_eq!(timer.completed_intervals(), 1);
        assert_eq!(timer.mode(), TimerMode::Break);
    }

    #[test]
    fn signal_first_then_local_tick_does_not_double_record() {
        let mut timer = core();
        timer.start();
        for _ in 0..1499 {
            timer.tick();
        }
        let signal = signal_for(&timer);
        let event = timer.handle_completion(&signal);
        assert!(matches!(
            event,
            Some(Event::IntervalCompleted {
                source: CompletionSource::KeeperSignal,
                ..
            })
        ));
        assert!(timer.tick().is_none());
        assert!(timer.handle_completion(&signal).is_none());
        assert_eq!(timer.sessions().len(), 1);
    }

    #[test]
    fn signal_for_abandoned_interval_is_ignored() {
        let mut timer = core();
        timer.start();
        let signal = signal_for(&timer);
        timer.reset();
        assert!(timer.handle_completion(&signal).is_none());
        assert_eq!(timer.mode(), TimerMode::Work);
        assert!(timer.sessions().is_empty());
    }

    #[test]
    fn signal_with_wrong_mode_is_ignored() {
        let mut timer = core();
        timer.start();
        let mut signal = signal_for(&timer);
        signal.completed_mode = TimerMode::Break;
        assert!(timer.handle_completion(&signal).is_none());
        assert!(timer.is_running());
    }

    #[test]
    fn reconcile_completes_when_keeper_deadline_passed() {
        let mut timer = core();
        timer.start();
        for _ in 0..1497 {
            timer.tick();
        }
        assert_eq!(timer.display_time(), "00:03");
        let status = KeeperStatus {
            is_active: true,
            mode: TimerMode::Work,
            interval_id: Some(timer.interval_id()),
            remaining_ms: 0,
            now_ms: 0,
            last_completed: None,
        };
        let event = timer.reconcile(&status);
        assert!(matches!(
            event,
            Some(Event::IntervalCompleted {
                source: CompletionSource::Reconciliation,
                ..
            })
        ));
        for _ in 0..3 {
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.sessions().len(), 1);
        assert_eq!(timer.completed_intervals(), 1);
    }

    #[test]
    fn reconcile_adopts_keeper_remaining_beyond_tolerance() {
        let mut timer = core();
        timer.start();
        let status = KeeperStatus {
            is_active: true,
            mode: TimerMode::Work,
            interval_id: Some(timer.interval_id()),
            remaining_ms: 600_500,
            now_ms: 0,
            last_completed: None,
        };
        let event = timer.reconcile(&status);
        assert!(matches!(
            event,
            Some(Event::DriftCorrected {
                from_secs: 1500,
                to_secs: 601,
                ..
            })
        ));

        let close = KeeperStatus {
            remaining_ms: 599_000,
            ..status
        };
        assert!(timer.reconcile(&close).is_none());
        assert_eq!(timer.remaining_secs(), 601);
    }

    #[test]
    fn reconcile_recovers_lost_broadcast() {
        let mut timer = core();
        timer.start();
        let done = signal_for(&timer);
        let status = KeeperStatus {
            is_active: false,
            mode: TimerMode::Break,
            interval_id: None,
            remaining_ms: 300_000,
            now_ms: 0,
            last_completed: Some(done.clone()),
        };
        assert!(timer.reconcile(&status).is_some());
        assert_eq!(timer.sessions().len(), 1);
        assert!(timer.reconcile(&status).is_none());
        assert!(timer.handle_completion(&done).is_none());
        assert_eq!(timer.sessions().len(), 1);
    }

    #[test]
    fn reconcile_rearms_keeper_that_lost_state() {
        let link = RecordingLink::default();
        let mut timer = TimerCore::new(
            IntervalDurations::default(),
            Box::new(link.clone()),
            Box::new(NoopAlert),
            Arc::new(ManualClock::new(0)),
        );
        timer.start();
        for _ in 0..100 {
            timer.tick();
        }
        let fresh = KeeperStatus {
            is_active: false,
            mode: TimerMode::Work,
            interval_id: None,
            remaining_ms: 1_500_000,
            now_ms: 0,
            last_completed: None,
        };
        assert!(matches!(
            timer.reconcile(&fresh),
            Some(Event::KeeperRearmed { remaining_secs: 1400, .. })
        ));
        let sent = link.sent.lock().unwrap();
        assert_eq!(
            sent.last(),
            Some(&crate::channel::WireMessage::Start {
                mode: TimerMode::Work,
                duration_ms: 1_400_000,
                interval_id: timer.interval_id(),
            })
        );
    }

    #[test]
    fn commands_are_mirrored_to_keeper() {
        use crate::channel::WireMessage;

        let link = RecordingLink::default();
        let mut timer = TimerCore::new(
            IntervalDurations::default(),
            Box::new(link.clone()),
            Box::new(NoopAlert),
            Arc::new(ManualClock::new(0)),
        );
        timer.start();
        timer.pause();
        timer.switch_mode();

        let sent = link.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![
                WireMessage::Start {
                    mode: TimerMode::Work,
                    duration_ms: 1_500_000,
                    interval_id: IntervalId(1),
                },
                WireMessage::Pause,
                WireMessage::Reset {
                    mode: TimerMode::Break,
                    duration_ms: 300_000,
                    interval_id: IntervalId(2),
                },
            ]
        );
    }

    #[test]
    fn alert_failure_does_not_block_completion() {
        let mut timer = TimerCore::new(
            IntervalDurations::new(1, 1),
            Box::new(DetachedLink),
            Box::new(BrokenAlert),
            Arc::new(ManualClock::new(0)),
        );
        timer.start();
        for _ in 0..60 {
            timer.tick();
        }
        assert_eq!(timer.mode(), TimerMode::Break);
        assert_eq!(timer.sessions().len(), 1);
        assert_eq!(timer.completed_intervals(), 1);
    }

    #[test]
    fn snapshot_reports_display_time() {
        let timer = core();
        match timer.snapshot() {
            Event::StateSnapshot {
                phase,
                display,
                remaining_secs,
                ..
            } => {
                assert_eq!(phase, Phase::Idle);
                assert_eq!(display, "25:00");
                assert_eq!(remaining_secs, 1500);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
