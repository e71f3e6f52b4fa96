//! Storage abstraction for TaskRunner
//!
//! All persistence goes through the [`Store`] trait so the lifecycle and
//! settlement logic can run against Postgres in production and an
//! in-memory fake in tests. The store is the only point of shared
//! mutation; the `*_if_*` methods are atomic conditional updates and
//! carry the concurrency contract (exactly one provider wins a contended
//! accept, a payment is credited at most once, a balance never goes
//! negative).

mod memory;
mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::geo::GeoPoint;
use crate::message::Message;
use crate::mission::{Mission, MissionStatus};
use crate::models::User;
use crate::notification::Notification;
use crate::payment::Payment;
use crate::rating::Rating;

#[async_trait]
pub trait Store: Send + Sync {
    // ===== Users =====

    async fn insert_user(&self, user: &User) -> ApiResult<()>;

    async fn get_user(&self, id: Uuid) -> ApiResult<Option<User>>;

    async fn update_location(&self, user_id: Uuid, location: GeoPoint) -> ApiResult<Option<User>>;

    async fn update_availability(&self, user_id: Uuid, available: bool) -> ApiResult<Option<User>>;

    async fn update_push_token(
        &self,
        user_id: Uuid,
        token: Option<String>,
    ) -> ApiResult<Option<User>>;

    async fn update_processor_customer(&self, user_id: Uuid, customer_id: &str) -> ApiResult<()>;

    /// Increment a provider's balance by `amount`
    async fn credit_balance(&self, user_id: Uuid, amount: f64) -> ApiResult<()>;

    /// Decrement a balance by `amount` only if the balance covers it.
    /// Returns false when the balance was insufficient.
    async fn debit_balance(&self, user_id: Uuid, amount: f64) -> ApiResult<bool>;

    async fn update_rating_aggregate(
        &self,
        user_id: Uuid,
        average: f64,
        count: i32,
    ) -> ApiResult<()>;

    /// Providers eligible for new-mission fan-out: role PROVIDER, status
    /// ACTIVE, available, with a known location and a push token.
    async fn available_providers(&self) -> ApiResult<Vec<User>>;

    // ===== Missions =====

    async fn insert_mission(&self, mission: &Mission) -> ApiResult<()>;

    async fn get_mission(&self, id: Uuid) -> ApiResult<Option<Mission>>;

    /// Atomically assign a provider to a PENDING mission. Returns the
    /// updated mission, or None when the mission was not PENDING (the
    /// caller lost the race or the mission moved on).
    async fn accept_mission_if_pending(
        &self,
        id: Uuid,
        provider_id: Uuid,
        at: DateTime<Utc>,
    ) -> ApiResult<Option<Mission>>;

    /// ACCEPTED -> IN_PROGRESS, conditioned on the current status
    async fn start_mission_if_accepted(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> ApiResult<Option<Mission>>;

    /// IN_PROGRESS -> COMPLETED, conditioned on the current status
    async fn complete_mission_if_in_progress(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> ApiResult<Option<Mission>>;

    /// Any non-terminal status -> CANCELLED; None when already terminal
    async fn cancel_mission(&self, id: Uuid) -> ApiResult<Option<Mission>>;

    /// Missions owned by a client, newest first
    async fn missions_for_client(
        &self,
        client_id: Uuid,
        status: Option<MissionStatus>,
    ) -> ApiResult<Vec<Mission>>;

    /// Missions assigned to a provider, newest first
    async fn missions_for_provider(
        &self,
        provider_id: Uuid,
        status: Option<MissionStatus>,
    ) -> ApiResult<Vec<Mission>>;

    /// PENDING missions with a known pickup coordinate, in creation order
    async fn pending_missions_with_pickup(&self) -> ApiResult<Vec<Mission>>;

    async fn completed_missions_for_provider(&self, provider_id: Uuid)
        -> ApiResult<Vec<Mission>>;

    // ===== Payments =====

    async fn insert_payment(&self, payment: &Payment) -> ApiResult<()>;

    async fn get_payment(&self, id: Uuid) -> ApiResult<Option<Payment>>;

    async fn get_payment_by_mission(&self, mission_id: Uuid) -> ApiResult<Option<Payment>>;

    async fn get_payment_by_intent(&self, intent_id: &str) -> ApiResult<Option<Payment>>;

    /// PENDING -> COMPLETED, conditioned on the current status. Returns
    /// false when the payment was not PENDING, so a confirmation retry or
    /// a concurrent webhook cannot credit the provider twice.
    async fn complete_payment_if_pending(&self, id: Uuid) -> ApiResult<bool>;

    async fn mark_payment_failed(&self, id: Uuid) -> ApiResult<()>;

    /// Payments made by a user, newest first
    async fn payments_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Payment>>;

    // ===== Messages =====

    async fn insert_message(&self, message: &Message) -> ApiResult<()>;

    /// Messages of a mission, oldest first
    async fn messages_for_mission(&self, mission_id: Uuid) -> ApiResult<Vec<Message>>;

    async fn mark_messages_read(&self, mission_id: Uuid, receiver_id: Uuid) -> ApiResult<()>;

    async fn unread_message_count(&self, user_id: Uuid) -> ApiResult<i64>;

    // ===== Ratings =====

    async fn insert_rating(&self, rating: &Rating) -> ApiResult<()>;

    async fn get_rating_by_mission(&self, mission_id: Uuid) -> ApiResult<Option<Rating>>;

    /// Ratings received by a user, newest first
    async fn ratings_for_user(&self, rated_id: Uuid) -> ApiResult<Vec<Rating>>;

    // ===== Notifications =====

    async fn insert_notification(&self, notification: &Notification) -> ApiResult<()>;

    /// Notifications for a user, newest first
    async fn notifications_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Notification>>;
}
