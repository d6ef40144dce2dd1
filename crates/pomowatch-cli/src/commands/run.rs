//! Interactive timer session.
//!
//! The foreground loop ticks the core once per second, applies completion
//! broadcasts from the keeper task and reads commands from stdin. When the
//! process was suspended long enough for ticks to be lost, it asks the keeper
//! for its deadline and reconciles. Every completion is appended to the
//! database as soon as it is recorded, so an interrupt loses nothing.

use std::sync::Arc;
use std::time::Duration;

use pomowatch_core::keeper;
use pomowatch_core::{
    AlertDispatcher, Clock, Config, CoreError, Database, Event, KeeperHandle, NoopAlert,
    SessionRecord, SessionStore, SystemClock, TimerCore, TimerMode,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::alert::TerminalAlert;

/// Wall-clock gap between two ticks that counts as a suspension.
const SUSPEND_GAP_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Start,
    Pause,
    Reset,
    Switch,
    Status,
    Sync,
    History,
    Clear,
    Quit,
}

impl Input {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Some(Input::Start),
            "pause" | "p" => Some(Input::Pause),
            "reset" | "r" => Some(Input::Reset),
            "switch" | "skip" => Some(Input::Switch),
            "status" => Some(Input::Status),
            "sync" => Some(Input::Sync),
            "history" => Some(Input::History),
            "clear" => Some(Input::Clear),
            "quit" | "q" | "exit" => Some(Input::Quit),
            _ => None,
        }
    }
}

pub fn run(mode: &str) -> Result<(), Box<dyn std::error::Error>> {
    let first = TimerMode::parse(mode).ok_or_else(|| format!("unknown mode: {mode}"))?;
    let config = Config::load()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(session(config, first));
    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_background();
    result
}

async fn session(config: Config, first: TimerMode) -> Result<(), Box<dyn std::error::Error>> {
    let durations = config.interval_durations();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (handle, keeper_task) = keeper::spawn(durations, config.keeper_config(), clock.clone());
    let mut completions = handle.subscribe();

    let mut db = Database::open()?;
    let alert: Box<dyn AlertDispatcher> = if config.alerts.enabled {
        Box::new(TerminalAlert::new(
            durations,
            config.sound_profile(),
            config.alerts.bell,
        ))
    } else {
        Box::new(NoopAlert)
    };
    let mut core = TimerCore::new(durations, Box::new(handle.clone()), alert, clock.clone())
        .with_drift_tolerance(config.keeper.drift_tolerance_secs);
    if first != core.mode() {
        core.switch_mode();
    }
    emit(&core.snapshot())?;

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut armed = core.generation();
    let mut last_tick_ms = clock.now_ms();
    let mut persisted = 0usize;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interrupt = std::pin::pin!(tokio::signal::ctrl_c());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = clock.now_ms();
                let gap = now.saturating_sub(last_tick_ms);
                last_tick_ms = now;
                if gap > SUSPEND_GAP_MS {
                    info!(gap_ms = gap, "tick loop was suspended, reconciling");
                    sync(&handle, &mut core).await?;
                }
                if let Some(event) = core.scheduled_tick(armed) {
                    emit(&event)?;
                }
            }
            signal = completions.recv(), if !handle.is_closed() => match signal {
                Ok(signal) => {
                    if let Some(event) = core.handle_completion(&signal) {
                        emit(&event)?;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "completion broadcasts lagged, reconciling");
                    sync(&handle, &mut core).await?;
                }
                Err(RecvError::Closed) => debug!("completion channel closed"),
            },
            result = &mut interrupt => {
                if let Err(e) = result {
                    warn!(error = %e, "interrupt listener failed");
                }
                info!("interrupted, ending session");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(input) = Input::parse(&line) else {
                    eprintln!("unknown command: {} (start|pause|reset|switch|status|sync|history|clear|quit)", line.trim());
                    continue;
                };
                let event = match input {
                    Input::Start => {
                        let event = core.start();
                        if event.is_some() {
                            armed = core.generation();
                            ticker.reset();
                            last_tick_ms = clock.now_ms();
                        }
                        event
                    }
                    Input::Pause => core.pause(),
                    Input::Reset => core.reset(),
                    Input::Switch => core.switch_mode(),
                    Input::Status => Some(core.snapshot()),
                    Input::Sync => {
                        sync(&handle, &mut core).await?;
                        None
                    }
                    Input::History => {
                        println!("{}", serde_json::to_string_pretty(core.sessions())?);
                        None
                    }
                    Input::Clear => {
                        let removed = db.clear_sessions()?;
                        core.clear_sessions();
                        persisted = 0;
                        println!("cleared {removed} sessions");
                        None
                    }
                    Input::Quit => break,
                };
                if let Some(event) = event {
                    emit(&event)?;
                }
            }
        }
        persist_new(&mut db, core.sessions(), &mut persisted)?;
    }

    persist_new(&mut db, core.sessions(), &mut persisted)?;
    if handle.is_closed() {
        warn!("keeper had stopped before the session ended");
    }
    keeper_task.abort();
    Ok(())
}

/// Append the records past `persisted` to `store` and advance the mark.
fn persist_new(
    store: &mut impl SessionStore,
    sessions: &[SessionRecord],
    persisted: &mut usize,
) -> Result<usize, CoreError> {
    let fresh = sessions.get(*persisted..).unwrap_or_default();
    if fresh.is_empty() {
        return Ok(0);
    }
    store.save(fresh)?;
    *persisted = sessions.len();
    info!(appended = fresh.len(), "sessions saved");
    Ok(fresh.len())
}

/// Ask the keeper where it stands and let the core settle any difference.
async fn sync(handle: &KeeperHandle, core: &mut TimerCore) -> Result<(), serde_json::Error> {
    match handle.query_status().await {
        Ok(status) => {
            if let Some(event) = core.reconcile(&status) {
                emit(&event)?;
            }
        }
        Err(e) => warn!(error = %e, "status query failed, keeping local countdown"),
    }
    Ok(())
}

fn emit(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
