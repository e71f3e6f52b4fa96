//! In-memory implementation of the storage interface
//!
//! Backs the test suite and local development without Postgres. All
//! conditional updates run under a single write lock, giving the same
//! atomicity the SQL compare-and-swap statements provide.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::geo::GeoPoint;
use crate::message::Message;
use crate::mission::{Assignment, Mission, MissionStatus};
use crate::models::{User, UserRole, UserStatus};
use crate::notification::Notification;
use crate::payment::{Payment, PaymentStatus};
use crate::rating::Rating;

use super::Store;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    // Vecs preserve insertion order, which is creation order in tests
    missions: Vec<Mission>,
    payments: Vec<Payment>,
    messages: Vec<Message>,
    ratings: Vec<Rating>,
    notifications: Vec<Notification>,
}

/// In-memory store
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    // ===== Users =====

    async fn insert_user(&self, user: &User) -> ApiResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.id) {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> ApiResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn update_location(&self, user_id: Uuid, location: GeoPoint) -> ApiResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&user_id).map(|user| {
            user.current_location = Some(location);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_availability(&self, user_id: Uuid, available: bool) -> ApiResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&user_id).map(|user| {
            user.is_available = available;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_push_token(
        &self,
        user_id: Uuid,
        token: Option<String>,
    ) -> ApiResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&user_id).map(|user| {
            user.push_token = token;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_processor_customer(&self, user_id: Uuid, customer_id: &str) -> ApiResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.processor_customer_id = Some(customer_id.to_string());
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn credit_balance(&self, user_id: Uuid, amount: f64) -> ApiResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.balance += amount;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn debit_balance(&self, user_id: Uuid, amount: f64) -> ApiResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&user_id) {
            Some(user) if user.balance >= amount => {
                user.balance -= amount;
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_rating_aggregate(
        &self,
        user_id: Uuid,
        average: f64,
        count: i32,
    ) -> ApiResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.average_rating = average;
            user.total_ratings = count;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn available_providers(&self) -> ApiResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .filter(|u| {
                u.role == UserRole::Provider
                    && u.status == UserStatus::Active
                    && u.is_available
                    && u.current_location.is_some()
                    && u.push_token.is_some()
            })
            .cloned()
            .collect())
    }

    // ===== Missions =====

    async fn insert_mission(&self, mission: &Mission) -> ApiResult<()> {
        self.inner.write().await.missions.push(mission.clone());
        Ok(())
    }

    async fn get_mission(&self, id: Uuid) -> ApiResult<Option<Mission>> {
        let inner = self.inner.read().await;
        Ok(inner.missions.iter().find(|m| m.id == id).cloned())
    }

    async fn accept_mission_if_pending(
        &self,
        id: Uuid,
        provider_id: Uuid,
        at: DateTime<Utc>,
    ) -> ApiResult<Option<Mission>> {
        let mut inner = self.inner.write().await;
        // Single critical section: the check and the write are atomic
        // with respect to any other accept attempt.
        match inner
            .missions
            .iter_mut()
            .find(|m| m.id == id && m.status == MissionStatus::Pending)
        {
            Some(mission) => {
                mission.status = MissionStatus::Accepted;
                mission.assignment = Assignment::Assigned {
                    provider_id,
                    accepted_at: at,
                };
                mission.updated_at = at;
                Ok(Some(mission.clone()))
            }
            None => Ok(None),
        }
    }

    async fn start_mission_if_accepted(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> ApiResult<Option<Mission>> {
        let mut inner = self.inner.write().await;
        match inner
            .missions
            .iter_mut()
            .find(|m| m.id == id && m.status == MissionStatus::Accepted)
        {
            Some(mission) => {
                mission.status = MissionStatus::InProgress;
                mission.started_at = Some(at);
                mission.updated_at = at;
                Ok(Some(mission.clone()))
            }
            None => Ok(None),
        }
    }

    async fn complete_mission_if_in_progress(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> ApiResult<Option<Mission>> {
        let mut inner = self.inner.write().await;
        match inner
            .missions
            .iter_mut()
            .find(|m| m.id == id && m.status == MissionStatus::InProgress)
        {
            Some(mission) => {
                mission.status = MissionStatus::Completed;
                mission.completed_at = Some(at);
                mission.updated_at = at;
                Ok(Some(mission.clone()))
            }
            None => Ok(None),
        }
    }

    async fn cancel_mission(&self, id: Uuid) -> ApiResult<Option<Mission>> {
        let mut inner = self.inner.write().await;
        match inner.missions.iter_mut().find(|m| {
            m.id == id
                && m.status != MissionStatus::Completed
                && m.status != MissionStatus::Cancelled
        }) {
            Some(mission) => {
                mission.status = MissionStatus::Cancelled;
                mission.updated_at = Utc::now();
                Ok(Some(mission.clone()))
            }
            None => Ok(None),
        }
    }

    async fn missions_for_client(
        &self,
        client_id: Uuid,
        status: Option<MissionStatus>,
    ) -> ApiResult<Vec<Mission>> {
        let inner = self.inner.read().await;
        let mut missions: Vec<Mission> = inner
            .missions
            .iter()
            .filter(|m| m.client_id == client_id && status.map_or(true, |s| m.status == s))
            .cloned()
            .collect();
        missions.reverse();
        Ok(missions)
    }

    async fn missions_for_provider(
        &self,
        provider_id: Uuid,
        status: Option<MissionStatus>,
    ) -> ApiResult<Vec<Mission>> {
        let inner = self.inner.read().await;
        let mut missions: Vec<Mission> = inner
            .missions
            .iter()
            .filter(|m| {
                m.provider_id() == Some(provider_id) && status.map_or(true, |s| m.status == s)
            })
            .cloned()
            .collect();
        missions.reverse();
        Ok(missions)
    }

    async fn pending_missions_with_pickup(&self) -> ApiResult<Vec<Mission>> {
        let inner = self.inner.read().await;
        Ok(inner
            .missions
            .iter()
            .filter(|m| m.status == MissionStatus::Pending && m.pickup_location.is_some())
            .cloned()
            .collect())
    }

    async fn completed_missions_for_provider(
        &self,
        provider_id: Uuid,
    ) -> ApiResult<Vec<Mission>> {
        let inner = self.inner.read().await;
        Ok(inner
            .missions
            .iter()
            .filter(|m| {
                m.provider_id() == Some(provider_id) && m.status == MissionStatus::Completed
            })
            .cloned()
            .collect())
    }

    // ===== Payments =====

    async fn insert_payment(&self, payment: &Payment) -> ApiResult<()> {
        let mut inner = self.inner.write().await;
        if inner
            .payments
            .iter()
            .any(|p| p.mission_id == payment.mission_id)
        {
            return Err(ApiError::Conflict(
                "Payment already exists for this mission".to_string(),
            ));
        }
        inner.payments.push(payment.clone());
        Ok(())
    }

    async fn get_payment(&self, id: Uuid) -> ApiResult<Option<Payment>> {
        let inner = self.inner.read().await;
        Ok(inner.payments.iter().find(|p| p.id == id).cloned())
    }

    async fn get_payment_by_mission(&self, mission_id: Uuid) -> ApiResult<Option<Payment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .payments
            .iter()
            .find(|p| p.mission_id == mission_id)
            .cloned())
    }

    async fn get_payment_by_intent(&self, intent_id: &str) -> ApiResult<Option<Payment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .payments
            .iter()
            .find(|p| p.processor_intent_id == intent_id)
            .cloned())
    }

    async fn complete_payment_if_pending(&self, id: Uuid) -> ApiResult<bool> {
        let mut inner = self.inner.write().await;
        match inner
            .payments
            .iter_mut()
            .find(|p| p.id == id && p.status == PaymentStatus::Pending)
        {
            Some(payment) => {
                payment.status = PaymentStatus::Completed;
                payment.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_payment_failed(&self, id: Uuid) -> ApiResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(payment) = inner.payments.iter_mut().find(|p| p.id == id) {
            payment.status = PaymentStatus::Failed;
            payment.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn payments_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Payment>> {
        let inner = self.inner.read().await;
        let mut payments: Vec<Payment> = inner
            .payments
            .iter()
            .filter(|p| p.payer_id == user_id)
            .cloned()
            .collect();
        payments.reverse();
        Ok(payments)
    }

    // ===== Messages =====

    async fn insert_message(&self, message: &Message) -> ApiResult<()> {
        self.inner.write().await.messages.push(message.clone());
        Ok(())
    }

    async fn messages_for_mission(&self, mission_id: Uuid) -> ApiResult<Vec<Message>> {
        let inner = self.inner.read().await;
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.mission_id == mission_id)
            .cloned()
            .collect())
    }

    async fn mark_messages_read(&self, mission_id: Uuid, receiver_id: Uuid) -> ApiResult<()> {
        let mut inner = self.inner.write().await;
        for message in inner
            .messages
            .iter_mut()
            .filter(|m| m.mission_id == mission_id && m.receiver_id == receiver_id && !m.is_read)
        {
            message.is_read = true;
        }
        Ok(())
    }

    async fn unread_message_count(&self, user_id: Uuid) -> ApiResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.receiver_id == user_id && !m.is_read)
            .count() as i64)
    }

    // ===== Ratings =====

    async fn insert_rating(&self, rating: &Rating) -> ApiResult<()> {
        let mut inner = self.inner.write().await;
        if inner
            .ratings
            .iter()
            .any(|r| r.mission_id == rating.mission_id)
        {
            return Err(ApiError::Conflict("Mission already rated".to_string()));
        }
        inner.ratings.push(rating.clone());
        Ok(())
    }

    async fn get_rating_by_mission(&self, mission_id: Uuid) -> ApiResult<Option<Rating>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .iter()
            .find(|r| r.mission_id == mission_id)
            .cloned())
    }

    async fn ratings_for_user(&self, rated_id: Uuid) -> ApiResult<Vec<Rating>> {
        let inner = self.inner.read().await;
        let mut ratings: Vec<Rating> = inner
            .ratings
            .iter()
            .filter(|r| r.rated_id == rated_id)
            .cloned()
            .collect();
        ratings.reverse();
        Ok(ratings)
    }

    // ===== Notifications =====

    async fn insert_notification(&self, notification: &Notification) -> ApiResult<()> {
        self.inner
            .write()
            .await
            .notifications
            .push(notification.clone());
        Ok(())
    }

    async fn notifications_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Notification>> {
        let inner = self.inner.read().await;
        let mut notifications: Vec<Notification> = inner
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notifications.reverse();
        Ok(notifications)
    }
}
