//! Notification models and lifecycle effect values

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Persisted notification record for in-app history (append-only)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification event kinds
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "notification_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    NewMission,
    MissionAccepted,
    MissionStarted,
    MissionCompleted,
    MissionCancelled,
    PaymentReceived,
    NewMessage,
}

/// A notification effect emitted by a lifecycle operation.
///
/// Services return these instead of dispatching inline; the dispatcher
/// consumes them after the state transition has committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub user_id: Uuid,
    pub push_token: Option<String>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

impl Notice {
    pub fn new(
        user_id: Uuid,
        push_token: Option<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            user_id,
            push_token,
            kind,
            title: title.into(),
            body: body.into(),
            data,
        }
    }
}
