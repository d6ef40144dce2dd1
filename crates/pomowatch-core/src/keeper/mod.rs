//! Background keeper.
//!
//! Holds a wall-clock deadline independent of the foreground countdown and
//! polls it once per second while active. On expiry it goes inactive and
//! broadcasts a [`CompletionSignal`](crate::channel::CompletionSignal).
//! Delivery is best-effort: if the task is torn down first, nothing is sent
//! and the foreground recovers through a status reconciliation.

mod deadline;
mod runtime;

pub use deadline::BackgroundDeadline;
pub use runtime::{spawn, KeeperConfig};
