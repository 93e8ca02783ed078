// =====================================================================================
// NOTIFICATION CELL MODELS
// =====================================================================================

use std::fmt;
use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_config::AppConfig;

pub type NotificationId = Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
            NotificationKind::Info => write!(f, "info"),
        }
    }
}

/// Visual state of a notification while it is on the display list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPhase {
    Entering,
    Visible,
    Exiting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub phase: NotificationPhase,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            phase: NotificationPhase::Entering,
            created_at: Utc::now(),
        }
    }
}

/// Display list changes, in the order they were applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    Added(Notification),
    PhaseChanged { id: NotificationId, phase: NotificationPhase },
    Removed { id: NotificationId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSettings {
    /// Delay between insertion and the `Visible` phase.
    pub enter_delay: Duration,
    /// Measured from insertion, not from becoming visible.
    pub dwell: Duration,
    pub exit_duration: Duration,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enter_delay: Duration::from_millis(100),
            dwell: Duration::from_secs(5),
            exit_duration: Duration::from_millis(300),
        }
    }
}

impl From<&AppConfig> for NotificationSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            enter_delay: config.notification_enter(),
            dwell: config.notification_dwell(),
            exit_duration: config.notification_exit(),
        }
    }
}
