//! # Pomowatch Core Library
//!
//! A Pomodoro countdown that keeps its place while the foreground is
//! suspended. Two cooperating contexts model one logical timer:
//!
//! - **Timer core**: the visible countdown, ticked once per second by its host
//! - **Keeper**: a background task holding an independent wall-clock deadline
//!
//! They share no memory. Commands and completions travel over the
//! [`channel`] module, and the completion guard makes every interval count
//! exactly once no matter which side notices the expiry first.
//!
//! ## Key Components
//!
//! - [`TimerCore`]: foreground state machine
//! - [`keeper::spawn`]: background deadline task
//! - [`SessionRecorder`]: append-only completion log
//! - [`AlertDispatcher`]: alert capability consumed by the core
//! - [`Config`]: TOML configuration

pub mod alert;
pub mod channel;
pub mod clock;
pub mod error;
pub mod events;
pub mod keeper;
pub mod session;
pub mod storage;
pub mod timer;

pub use alert::{AlertDispatcher, AlertMessage, NoopAlert, SoundProfile};
pub use channel::{CompletionSignal, KeeperCommand, KeeperHandle, KeeperLink, KeeperStatus, WireMessage};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AlertError, ConfigError, CoreError, DatabaseError, LinkError};
pub use events::{CompletionSource, Event};
pub use keeper::{BackgroundDeadline, KeeperConfig};
pub use session::{SessionRecord, SessionRecorder, SessionStore};
pub use storage::{Config, Database};
pub use timer::{IntervalDurations, IntervalId, Phase, TimerCore, TimerMode, TimerState};
