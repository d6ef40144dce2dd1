//! Message link between the foreground core and the background keeper.
//!
//! Commands travel foreground -> keeper over a bounded `mpsc` channel and are
//! fire-and-forget: a full or closed channel drops the command and reports a
//! [`LinkError`]. Completions travel keeper -> foreground over a `broadcast`
//! channel so that every live foreground context (zero or more) sees them.
//! Status is the only request/response exchange and uses a dedicated oneshot
//! reply. Nothing here guarantees delivery or ordering across the link.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::error::LinkError;
use crate::timer::{IntervalId, TimerMode};

/// Raised by the keeper when its deadline passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSignal {
    pub interval_id: IntervalId,
    pub completed_mode: TimerMode,
    pub next_mode: TimerMode,
    pub next_duration_ms: u64,
}

/// Reply to a status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeeperStatus {
    pub is_active: bool,
    pub mode: TimerMode,
    /// Interval the keeper is armed for; `None` after an expiry until the
    /// foreground arms the next one.
    pub interval_id: Option<IntervalId>,
    pub remaining_ms: u64,
    pub now_ms: u64,
    /// The most recent completion the keeper raised, in case its broadcast
    /// had no listener.
    #[serde(default)]
    pub last_completed: Option<CompletionSignal>,
}

#[derive(Debug)]
pub enum KeeperCommand {
    Start {
        mode: TimerMode,
        duration_ms: u64,
        interval_id: IntervalId,
    },
    Pause,
    Reset {
        mode: TimerMode,
        duration_ms: u64,
        interval_id: IntervalId,
    },
    QueryStatus {
        reply: oneshot::Sender<KeeperStatus>,
    },
}

impl KeeperCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            KeeperCommand::Start { .. } => "start",
            KeeperCommand::Pause => "pause",
            KeeperCommand::Reset { .. } => "reset",
            KeeperCommand::QueryStatus { .. } => "status_query",
        }
    }

    /// Wire form of this command. The reply port of a status query has no
    /// wire representation.
    pub fn to_wire(&self) -> WireMessage {
        match self {
            KeeperCommand::Start {
                mode,
                duration_ms,
                interval_id,
            } => WireMessage::Start {
                mode: *mode,
                duration_ms: *duration_ms,
                interval_id: *interval_id,
            },
            KeeperCommand::Pause => WireMessage::Pause,
            KeeperCommand::Reset {
                mode,
                duration_ms,
                interval_id,
            } => WireMessage::Reset {
                mode: *mode,
                duration_ms: *duration_ms,
                interval_id: *interval_id,
            },
            KeeperCommand::QueryStatus { .. } => WireMessage::StatusQuery,
        }
    }
}

/// Serialized message schema, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireMessage {
    #[serde(rename_all = "camelCase")]
    Start {
        mode: TimerMode,
        duration_ms: u64,
        interval_id: IntervalId,
    },
    Pause,
    #[serde(rename_all = "camelCase")]
    Reset {
        mode: TimerMode,
        duration_ms: u64,
        interval_id: IntervalId,
    },
    StatusQuery,
    Status(KeeperStatus),
    Completed(CompletionSignal),
}

impl WireMessage {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Outbound side of the link as seen by the foreground core.
pub trait KeeperLink: Send {
    /// Hand a command to the keeper without waiting for it to be applied.
    fn send(&self, command: KeeperCommand) -> Result<(), LinkError>;
}

/// Link used when no keeper exists. Every command is reported as undeliverable
/// and the core runs on its own countdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedLink;

impl KeeperLink for DetachedLink {
    fn send(&self, _command: KeeperCommand) -> Result<(), LinkError> {
        Err(LinkError::Closed)
    }
}

/// Cloneable foreground handle to a running keeper task.
#[derive(Debug, Clone)]
pub struct KeeperHandle {
    commands: mpsc::Sender<KeeperCommand>,
    completions: broadcast::Sender<CompletionSignal>,
    status_timeout: Duration,
}

impl KeeperHandle {
    pub(crate) fn new(
        commands: mpsc::Sender<KeeperCommand>,
        completions: broadcast::Sender<CompletionSignal>,
        status_timeout: Duration,
    ) -> Self {
        Self {
            commands,
            completions,
            status_timeout,
        }
    }

    /// Register a new foreground context for completion broadcasts.
    pub fn subscribe(&self) -> broadcast::Receiver<CompletionSignal> {
        self.completions.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Ask the keeper for its current deadline.
    ///
    /// # Errors
    /// `LinkError::Closed` if the keeper is gone, `LinkError::Full` if the
    /// command buffer is saturated, `LinkError::Timeout` if no reply arrives
    /// within the configured budget.
    pub async fn query_status(&self) -> Result<KeeperStatus, LinkError> {
        let (reply, answer) = oneshot::channel();
        self.send(KeeperCommand::QueryStatus { reply })?;
        match tokio::time::timeout(self.status_timeout, answer).await {
            Ok(Ok(status)) => Ok(status),
            Ok(Err(_)) => Err(LinkError::Closed),
            Err(_) => Err(LinkError::Timeout {
                timeout_ms: self.status_timeout.as_millis() as u64,
            }),
        }
    }
}

impl KeeperLink for KeeperHandle {
    fn send(&self, command: KeeperCommand) -> Result<(), LinkError> {
        self.commands.try_send(command).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => LinkError::Full,
            mpsc::error::TrySendError::Closed(_) => LinkError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags_follow_schema() {
        let start = WireMessage::Start {
            mode: TimerMode::Work,
            duration_ms: 1_500_000,
            interval_id: IntervalId(3),
        };
        let json: serde_json::Value = serde_json::from_str(&start.encode().unwrap()).unwrap();
        assert_eq!(json["type"], "START");
        assert_eq!(json["mode"], "work");
        assert_eq!(json["durationMs"], 1_500_000);
        assert_eq!(json["intervalId"], 3);

        let pause = WireMessage::Pause.encode().unwrap();
        assert_eq!(pause, r#"{"type":"PAUSE"}"#);
        assert_eq!(
            WireMessage::StatusQuery.encode().unwrap(),
            r#"{"type":"STATUS_QUERY"}"#
        );
    }

    #[test]
    fn completed_message_decodes() {
        let raw = r#"{"type":"COMPLETED","intervalId":7,"completedMode":"work","nextMode":"break","nextDurationMs":300000}"#;
        let msg = WireMessage::decode(raw).unwrap();
        assert_eq!(
            msg,
            WireMessage::Completed(CompletionSignal {
                interval_id: IntervalId(7),
                completed_mode: TimerMode::Work,
                next_mode: TimerMode::Break,
                next_duration_ms: 300_000,
            })
        );
    }

    #[test]
    fn status_reply_uses_camel_case() {
        let status = KeeperStatus {
            is_active: true,
            mode: TimerMode::Break,
            interval_id: Some(IntervalId(2)),
            remaining_ms: 4_000,
            now_ms: 10,
            last_completed: None,
        };
        let json = serde_json::to_value(WireMessage::Status(status)).unwrap();
        assert_eq!(json["type"], "STATUS");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["remainingMs"], 4_000);
        assert_eq!(json["nowMs"], 10);
    }

    #[test]
    fn detached_link_reports_closed() {
        assert_eq!(DetachedLink.send(KeeperCommand::Pause), Err(LinkError::Closed));
    }

    #[test]
    fn full_buffer_drops_command() {
        let (tx, _rx) = mpsc::channel(1);
        let (done, _) = broadcast::channel(1);
        let handle = KeeperHandle::new(tx, done, Duration::from_millis(10));
        assert!(handle.send(KeeperCommand::Pause).is_ok());
        assert_eq!(handle.send(KeeperCommand::Pause), Err(LinkError::Full));
    }

    #[test]
    fn closed_receiver_reports_closed() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let (done, _) = broadcast::channel(1);
        let handle = KeeperHandle::new(tx, done, Duration::from_millis(10));
        assert!(handle.is_closed());
        assert_eq!(handle.send(KeeperCommand::Pause), Err(LinkError::Closed));
    }

    #[test]
    fn command_kind_and_wire_form_agree() {
        let (reply, _answer) = oneshot::channel();
        let query = KeeperCommand::QueryStatus { reply };
        assert_eq!(query.kind(), "status_query");
        assert_eq!(query.to_wire(), WireMessage::StatusQuery);
    }
}
