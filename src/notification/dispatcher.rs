//! Notification dispatcher
//!
//! Consumes the notices emitted by lifecycle operations and turns each
//! into a best-effort push plus a persisted in-app record. Both effects
//! are independent: a push failure never loses the record and a storage
//! failure never skips the push. Nothing here propagates errors back to
//! the workflow that produced the notices.

use chrono::Utc;
use futures_util::future::join_all;
use std::sync::Arc;
use uuid::Uuid;

use crate::notification::{Notice, Notification};
use crate::store::Store;

use super::push::{PushGateway, PushMessage};

pub struct NotificationDispatcher {
    store: Arc<dyn Store>,
    gateway: Arc<dyn PushGateway>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn Store>, gateway: Arc<dyn PushGateway>) -> Self {
        Self { store, gateway }
    }

    /// Dispatch a batch of notices without blocking the caller
    pub fn spawn_dispatch(self: &Arc<Self>, notices: Vec<Notice>) {
        if notices.is_empty() {
            return;
        }
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.dispatch_all(notices).await;
        });
    }

    /// Dispatch a batch of notices, swallowing and logging every failure
    pub async fn dispatch_all(&self, notices: Vec<Notice>) {
        // Persist records first so in-app history never depends on the
        // gateway being reachable.
        join_all(notices.iter().map(|notice| self.persist(notice))).await;

        // A multi-notice batch is a broadcast of one message (new-mission
        // fan-out); everything else is a single recipient.
        let addressed: Vec<(&String, &Notice)> = notices
            .iter()
            .filter_map(|n| n.push_token.as_ref().map(|t| (t, n)))
            .collect();

        match addressed.as_slice() {
            [] => {}
            [(token, notice)] => {
                let message = to_push_message(notice);
                if let Err(e) = self.gateway.send(token, &message).await {
                    tracing::warn!(user_id = %notice.user_id, error = %e, "Push delivery failed");
                }
            }
            batch => {
                let tokens: Vec<String> = batch.iter().map(|(t, _)| (*t).clone()).collect();
                let message = to_push_message(batch[0].1);
                match self.gateway.send_multicast(&tokens, &message).await {
                    Ok(delivered) => {
                        tracing::info!(
                            delivered,
                            recipients = tokens.len(),
                            "Broadcast push dispatched"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(recipients = tokens.len(), error = %e, "Broadcast push failed");
                    }
                }
            }
        }
    }

    async fn persist(&self, notice: &Notice) {
        let record = Notification {
            id: Uuid::new_v4(),
            user_id: notice.user_id,
            kind: notice.kind,
            title: notice.title.clone(),
            body: notice.body.clone(),
            data: notice.data.clone(),
            is_read: false,
            created_at: Utc::now(),
        };

        if let Err(e) = self.store.insert_notification(&record).await {
            tracing::warn!(user_id = %notice.user_id, error = %e, "Failed to persist notification");
        }
    }
}

fn to_push_message(notice: &Notice) -> PushMessage {
    PushMessage {
        title: notice.title.clone(),
        body: notice.body.clone(),
        data: notice.data.clone(),
    }
}
