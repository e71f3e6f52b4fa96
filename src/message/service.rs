//! Message service for mission chat

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{authorize, Action, Relation};
use crate::error::{ApiError, ApiResult};
use crate::mission::Mission;
use crate::notification::{Notice, NotificationKind};
use crate::store::Store;

use super::model::Message;

pub struct MessageService {
    store: Arc<dyn Store>,
}

impl MessageService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Send a message to the other mission party
    pub async fn send(
        &self,
        sender_id: Uuid,
        mission_id: Uuid,
        content: String,
    ) -> ApiResult<(Message, Vec<Notice>)> {
        let sender = self
            .store
            .get_user(sender_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let mission = self.mission(mission_id).await?;
        authorize(
            Action::SendMessage,
            sender.role,
            Relation::to_mission(&mission, sender_id),
        )?;

        if content.trim().is_empty() {
            return Err(ApiError::Validation(
                "Message content must not be empty".to_string(),
            ));
        }

        let receiver_id = mission
            .counterparty(sender_id)
            .ok_or_else(|| ApiError::Validation("Mission has no provider yet".to_string()))?;

        let message = Message {
            id: Uuid::new_v4(),
            mission_id,
            sender_id,
            receiver_id,
            content,
            is_read: false,
            created_at: Utc::now(),
        };

        self.store.insert_message(&message).await?;

        let notices = self
            .store
            .get_user(receiver_id)
            .await?
            .map(|receiver| {
                vec![Notice::new(
                    receiver.id,
                    receiver.push_token.clone(),
                    NotificationKind::NewMessage,
                    format!("Message from {}", sender.first_name),
                    message.content.clone(),
                    serde_json::json!({ "mission_id": mission_id }),
                )]
            })
            .unwrap_or_default();

        Ok((message, notices))
    }

    /// Messages of a mission, oldest first. Reading marks the caller's
    /// incoming messages as read.
    pub async fn list(&self, mission_id: Uuid, user_id: Uuid) -> ApiResult<Vec<Message>> {
        let caller = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let mission = self.mission(mission_id).await?;
        authorize(
            Action::ViewMessages,
            caller.role,
            Relation::to_mission(&mission, user_id),
        )?;

        let messages = self.store.messages_for_mission(mission_id).await?;
        self.store.mark_messages_read(mission_id, user_id).await?;

        Ok(messages)
    }

    /// Count of unread messages addressed to the user
    pub async fn unread_count(&self, user_id: Uuid) -> ApiResult<i64> {
        self.store.unread_message_count(user_id).await
    }

    async fn mission(&self, id: Uuid) -> ApiResult<Mission> {
        self.store
            .get_mission(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Mission not found".to_string()))
    }
}
