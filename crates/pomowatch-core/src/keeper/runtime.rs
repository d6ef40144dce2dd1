use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use super::deadline::BackgroundDeadline;
use crate::channel::{CompletionSignal, KeeperCommand, KeeperHandle};
use crate::clock::Clock;
use crate::timer::IntervalDurations;

/// Tuning for the keeper task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeeperConfig {
    pub poll_interval: Duration,
    pub command_buffer: usize,
    pub completion_buffer: usize,
    pub status_timeout: Duration,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            command_buffer: 32,
            completion_buffer: 16,
            status_timeout: Duration::from_millis(500),
        }
    }
}

/// Spawn the keeper on the current tokio runtime.
///
/// The task lives until every [`KeeperHandle`] clone is dropped. Aborting the
/// returned `JoinHandle` models the host discarding the background context:
/// no completion is sent, and further commands report `LinkError::Closed`.
pub fn spawn(
    durations: IntervalDurations,
    config: KeeperConfig,
    clock: Arc<dyn Clock>,
) -> (KeeperHandle, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
    let (completion_tx, _) = broadcast::channel(config.completion_buffer.max(1));
    let handle = KeeperHandle::new(command_tx, completion_tx.clone(), config.status_timeout);
    let task = tokio::spawn(run(
        BackgroundDeadline::new(durations),
        command_rx,
        completion_tx,
        clock,
        config.poll_interval,
    ));
    (handle, task)
}

fn poll_timer(period: Duration) -> Interval {
    let mut poll = tokio::time::interval_at(Instant::now() + period, period);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    poll
}

async fn run(
    mut deadline: BackgroundDeadline,
    mut commands: mpsc::Receiver<KeeperCommand>,
    completions: broadcast::Sender<CompletionSignal>,
    clock: Arc<dyn Clock>,
    poll_every: Duration,
) {
    let mut poll = poll_timer(poll_every);

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("all keeper handles dropped, stopping");
                    break;
                };
                let now = clock.now_ms();
                match command {
                    KeeperCommand::Start { mode, duration_ms, interval_id } => {
                        deadline.start(mode, duration_ms, interval_id, now);
                        // Restart the poll cadence from this start.
                        poll = poll_timer(poll_every);
                        debug!(%mode, duration_ms, %interval_id, "keeper armed and running");
                    }
                    KeeperCommand::Pause => {
                        deadline.pause(now);
                        debug!(remaining_ms = deadline.remaining_ms(now), "keeper paused");
                    }
                    KeeperCommand::Reset { mode, duration_ms, interval_id } => {
                        deadline.reset(mode, duration_ms, interval_id);
                        debug!(%mode, duration_ms, %interval_id, "keeper reset");
                    }
                    KeeperCommand::QueryStatus { reply } => {
                        // The asker may have given up already.
                        let _ = reply.send(deadline.status(now));
                    }
                }
            }
            _ = poll.tick(), if deadline.is_active() => {
                if let Some(signal) = deadline.poll(clock.now_ms()) {
                    match completions.send(signal.clone()) {
                        Ok(listeners) => info!(
                            interval_id = %signal.interval_id,
                            completed = %signal.completed_mode,
                            listeners,
                            "keeper deadline expired"
                        ),
                        Err(_) => debug!(
                            interval_id = %signal.interval_id,
                            "keeper deadline expired with no foreground listening"
                        ),
                    }
                }
            }
        }
    }
}
