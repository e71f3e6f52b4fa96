//! PostgreSQL implementation of the storage interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::geo::GeoPoint;
use crate::message::Message;
use crate::mission::{Assignment, Mission, MissionStatus, Urgency};
use crate::models::{User, UserRole, UserStatus};
use crate::notification::{Notification, NotificationKind};
use crate::payment::{Payment, PaymentStatus};
use crate::rating::Rating;

use super::Store;

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row shape for users; location is split across nullable columns
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    profile_picture: Option<String>,
    role: UserRole,
    status: UserStatus,
    current_latitude: Option<f64>,
    current_longitude: Option<f64>,
    is_available: bool,
    service_radius_km: Option<f64>,
    balance: f64,
    average_rating: f64,
    total_ratings: i32,
    push_token: Option<String>,
    processor_customer_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let current_location = match (row.current_latitude, row.current_longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };

        User {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            profile_picture: row.profile_picture,
            role: row.role,
            status: row.status,
            current_location,
            is_available: row.is_available,
            service_radius_km: row.service_radius_km,
            balance: row.balance,
            average_rating: row.average_rating,
            total_ratings: row.total_ratings,
            push_token: row.push_token,
            processor_customer_id: row.processor_customer_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Flat row shape for missions; the assignment sum type is reconstructed
/// from the nullable provider columns
#[derive(sqlx::FromRow)]
struct MissionRow {
    id: Uuid,
    client_id: Uuid,
    title: String,
    description: String,
    category: String,
    pickup_address: String,
    pickup_latitude: Option<f64>,
    pickup_longitude: Option<f64>,
    delivery_address: Option<String>,
    delivery_latitude: Option<f64>,
    delivery_longitude: Option<f64>,
    urgency: Urgency,
    client_price: f64,
    platform_fee: f64,
    provider_earning: f64,
    status: MissionStatus,
    provider_id: Option<Uuid>,
    accepted_at: Option<DateTime<Utc>>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    estimated_duration_minutes: Option<i32>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MissionRow> for Mission {
    fn from(row: MissionRow) -> Self {
        let pickup_location = match (row.pickup_latitude, row.pickup_longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };
        let delivery_location = match (row.delivery_latitude, row.delivery_longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };
        let assignment = match (row.provider_id, row.accepted_at) {
            (Some(provider_id), Some(accepted_at)) => Assignment::Assigned {
                provider_id,
                accepted_at,
            },
            _ => Assignment::Unassigned,
        };

        Mission {
            id: row.id,
            client_id: row.client_id,
            title: row.title,
            description: row.description,
            category: row.category,
            pickup_address: row.pickup_address,
            pickup_location,
            delivery_address: row.delivery_address,
            delivery_location,
            urgency: row.urgency,
            client_price: row.client_price,
            platform_fee: row.platform_fee,
            provider_earning: row.provider_earning,
            status: row.status,
            assignment,
            started_at: row.started_at,
            completed_at: row.completed_at,
            estimated_duration_minutes: row.estimated_duration_minutes,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn unique_violation(err: sqlx::Error, message: &str) -> ApiError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return ApiError::Conflict(message.to_string());
        }
    }
    err.into()
}

#[async_trait]
impl Store for PgStore {
    // ===== Users =====

    async fn insert_user(&self, user: &User) -> ApiResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, first_name, last_name, phone, profile_picture, role, status,
                current_latitude, current_longitude, is_available, service_radius_km,
                balance, average_rating, total_ratings, push_token, processor_customer_id,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.profile_picture)
        .bind(user.role)
        .bind(user.status)
        .bind(user.current_location.map(|p| p.latitude))
        .bind(user.current_location.map(|p| p.longitude))
        .bind(user.is_available)
        .bind(user.service_radius_km)
        .bind(user.balance)
        .bind(user.average_rating)
        .bind(user.total_ratings)
        .bind(&user.push_token)
        .bind(&user.processor_customer_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "User already exists"))?;

        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> ApiResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    async fn update_location(&self, user_id: Uuid, location: GeoPoint) -> ApiResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET current_latitude = $2, current_longitude = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update_availability(&self, user_id: Uuid, available: bool) -> ApiResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET is_available = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(available)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update_push_token(
        &self,
        user_id: Uuid,
        token: Option<String>,
    ) -> ApiResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET push_token = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update_processor_customer(&self, user_id: Uuid, customer_id: &str) -> ApiResult<()> {
        sqlx::query("UPDATE users SET processor_customer_id = $2, updated_at = $3 WHERE id = $1")
            .bind(user_id)
            .bind(customer_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn credit_balance(&self, user_id: Uuid, amount: f64) -> ApiResult<()> {
        sqlx::query("UPDATE users SET balance = balance + $2, updated_at = $3 WHERE id = $1")
            .bind(user_id)
            .bind(amount)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn debit_balance(&self, user_id: Uuid, amount: f64) -> ApiResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET balance = balance - $2, updated_at = $3
            WHERE id = $1 AND balance >= $2
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_rating_aggregate(
        &self,
        user_id: Uuid,
        average: f64,
        count: i32,
    ) -> ApiResult<()> {
        sqlx::query(
            "UPDATE users SET average_rating = $2, total_ratings = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(user_id)
        .bind(average)
        .bind(count)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn available_providers(&self) -> ApiResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT * FROM users
            WHERE role = $1
              AND status = $2
              AND is_available = TRUE
              AND current_latitude IS NOT NULL
              AND current_longitude IS NOT NULL
              AND push_token IS NOT NULL
            "#,
        )
        .bind(UserRole::Provider)
        .bind(UserStatus::Active)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    // ===== Missions =====

    async fn insert_mission(&self, mission: &Mission) -> ApiResult<()> {
        let accepted_at = match mission.assignment {
            Assignment::Assigned { accepted_at, .. } => Some(accepted_at),
            Assignment::Unassigned => None,
        };

        sqlx::query(
            r#"
            INSERT INTO missions (
                id, client_id, title, description, category, pickup_address,
                pickup_latitude, pickup_longitude, delivery_address, delivery_latitude,
                delivery_longitude, urgency, client_price, platform_fee, provider_earning,
                status, provider_id, accepted_at, started_at, completed_at,
                estimated_duration_minutes, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24)
            "#,
        )
        .bind(mission.id)
        .bind(mission.client_id)
        .bind(&mission.title)
        .bind(&mission.description)
        .bind(&mission.category)
        .bind(&mission.pickup_address)
        .bind(mission.pickup_location.map(|p| p.latitude))
        .bind(mission.pickup_location.map(|p| p.longitude))
        .bind(&mission.delivery_address)
        .bind(mission.delivery_location.map(|p| p.latitude))
        .bind(mission.delivery_location.map(|p| p.longitude))
        .bind(mission.urgency)
        .bind(mission.client_price)
        .bind(mission.platform_fee)
        .bind(mission.provider_earning)
        .bind(mission.status)
        .bind(mission.provider_id())
        .bind(accepted_at)
        .bind(mission.started_at)
        .bind(mission.completed_at)
        .bind(mission.estimated_duration_minutes)
        .bind(&mission.notes)
        .bind(mission.created_at)
        .bind(mission.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_mission(&self, id: Uuid) -> ApiResult<Option<Mission>> {
        let row = sqlx::query_as::<_, MissionRow>("SELECT * FROM missions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Mission::from))
    }

    async fn accept_mission_if_pending(
        &self,
        id: Uuid,
        provider_id: Uuid,
        at: DateTime<Utc>,
    ) -> ApiResult<Option<Mission>> {
        // The status guard makes this a compare-and-swap: of two racing
        // providers, exactly one update matches a PENDING row.
        let row = sqlx::query_as::<_, MissionRow>(
            r#"
            UPDATE missions
            SET provider_id = $2, status = $3, accepted_at = $4, updated_at = $4
            WHERE id = $1 AND status = $5
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(provider_id)
        .bind(MissionStatus::Accepted)
        .bind(at)
        .bind(MissionStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Mission::from))
    }

    async fn start_mission_if_accepted(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> ApiResult<Option<Mission>> {
        let row = sqlx::query_as::<_, MissionRow>(
            r#"
            UPDATE missions
            SET status = $2, started_at = $3, updated_at = $3
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(MissionStatus::InProgress)
        .bind(at)
        .bind(MissionStatus::Accepted)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Mission::from))
    }

    async fn complete_mission_if_in_progress(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> ApiResult<Option<Mission>> {
        let row = sqlx::query_as::<_, MissionRow>(
            r#"
            UPDATE missions
            SET status = $2, completed_at = $3, updated_at = $3
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(MissionStatus::Completed)
        .bind(at)
        .bind(MissionStatus::InProgress)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Mission::from))
    }

    async fn cancel_mission(&self, id: Uuid) -> ApiResult<Option<Mission>> {
        let row = sqlx::query_as::<_, MissionRow>(
            r#"
            UPDATE missions
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status NOT IN ($4, $2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(MissionStatus::Cancelled)
        .bind(Utc::now())
        .bind(MissionStatus::Completed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Mission::from))
    }

    async fn missions_for_client(
        &self,
        client_id: Uuid,
        status: Option<MissionStatus>,
    ) -> ApiResult<Vec<Mission>> {
        let mut builder: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            "SELECT * FROM missions WHERE client_id = ",
        );
        builder.push_bind(client_id);
        if let Some(status) = status {
            builder.push(" AND status = ");
            builder.push_bind(status);
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<MissionRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Mission::from).collect())
    }

    async fn missions_for_provider(
        &self,
        provider_id: Uuid,
        status: Option<MissionStatus>,
    ) -> ApiResult<Vec<Mission>> {
        let mut builder: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            "SELECT * FROM missions WHERE provider_id = ",
        );
        builder.push_bind(provider_id);
        if let Some(status) = status {
            builder.push(" AND status = ");
            builder.push_bind(status);
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<MissionRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Mission::from).collect())
    }

    async fn pending_missions_with_pickup(&self) -> ApiResult<Vec<Mission>> {
        let rows = sqlx::query_as::<_, MissionRow>(
            r#"
            SELECT * FROM missions
            WHERE status = $1
              AND pickup_latitude IS NOT NULL
              AND pickup_longitude IS NOT NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(MissionStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Mission::from).collect())
    }

    async fn completed_missions_for_provider(
        &self,
        provider_id: Uuid,
    ) -> ApiResult<Vec<Mission>> {
        let rows = sqlx::query_as::<_, MissionRow>(
            "SELECT * FROM missions WHERE provider_id = $1 AND status = $2 ORDER BY created_at DESC",
        )
        .bind(provider_id)
        .bind(MissionStatus::Completed)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Mission::from).collect())
    }

    // ===== Payments =====

    async fn insert_payment(&self, payment: &Payment) -> ApiResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, mission_id, payer_id, amount, platform_fee, provider_earning,
                processor_intent_id, client_secret, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(payment.id)
        .bind(payment.mission_id)
        .bind(payment.payer_id)
        .bind(payment.amount)
        .bind(payment.platform_fee)
        .bind(payment.provider_earning)
        .bind(&payment.processor_intent_id)
        .bind(&payment.client_secret)
        .bind(payment.status)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Payment already exists for this mission"))?;

        Ok(())
    }

    async fn get_payment(&self, id: Uuid) -> ApiResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, PaymentRow>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment.map(Payment::from))
    }

    async fn get_payment_by_mission(&self, mission_id: Uuid) -> ApiResult<Option<Payment>> {
        let payment =
            sqlx::query_as::<_, PaymentRow>("SELECT * FROM payments WHERE mission_id = $1")
                .bind(mission_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(payment.map(Payment::from))
    }

    async fn get_payment_by_intent(&self, intent_id: &str) -> ApiResult<Option<Payment>> {
        let payment =
            sqlx::query_as::<_, PaymentRow>("SELECT * FROM payments WHERE processor_intent_id = $1")
                .bind(intent_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(payment.map(Payment::from))
    }

    async fn complete_payment_if_pending(&self, id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query(
            "UPDATE payments SET status = $2, updated_at = $3 WHERE id = $1 AND status = $4",
        )
        .bind(id)
        .bind(PaymentStatus::Completed)
        .bind(Utc::now())
        .bind(PaymentStatus::Pending)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_payment_failed(&self, id: Uuid) -> ApiResult<()> {
        sqlx::query("UPDATE payments SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(PaymentStatus::Failed)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn payments_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, PaymentRow>(
            "SELECT * FROM payments WHERE payer_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments.into_iter().map(Payment::from).collect())
    }

    // ===== Messages =====

    async fn insert_message(&self, message: &Message) -> ApiResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, mission_id, sender_id, receiver_id, content, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id)
        .bind(message.mission_id)
        .bind(message.sender_id)
        .bind(message.receiver_id)
        .bind(&message.content)
        .bind(message.is_read)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn messages_for_mission(&self, mission_id: Uuid) -> ApiResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, MessageRow>(
            "SELECT * FROM messages WHERE mission_id = $1 ORDER BY created_at ASC",
        )
        .bind(mission_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages.into_iter().map(Message::from).collect())
    }

    async fn mark_messages_read(&self, mission_id: Uuid, receiver_id: Uuid) -> ApiResult<()> {
        sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE mission_id = $1 AND receiver_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(mission_id)
        .bind(receiver_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn unread_message_count(&self, user_id: Uuid) -> ApiResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // ===== Ratings =====

    async fn insert_rating(&self, rating: &Rating) -> ApiResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ratings (id, mission_id, rater_id, rated_id, score, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(rating.id)
        .bind(rating.mission_id)
        .bind(rating.rater_id)
        .bind(rating.rated_id)
        .bind(rating.score)
        .bind(&rating.comment)
        .bind(rating.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Mission already rated"))?;

        Ok(())
    }

    async fn get_rating_by_mission(&self, mission_id: Uuid) -> ApiResult<Option<Rating>> {
        let rating = sqlx::query_as::<_, RatingRow>("SELECT * FROM ratings WHERE mission_id = $1")
            .bind(mission_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rating.map(Rating::from))
    }

    async fn ratings_for_user(&self, rated_id: Uuid) -> ApiResult<Vec<Rating>> {
        let ratings = sqlx::query_as::<_, RatingRow>(
            "SELECT * FROM ratings WHERE rated_id = $1 ORDER BY created_at DESC",
        )
        .bind(rated_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings.into_iter().map(Rating::from).collect())
    }

    // ===== Notifications =====

    async fn insert_notification(&self, notification: &Notification) -> ApiResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, body, data, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(notification.kind)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.data)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn notifications_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    mission_id: Uuid,
    payer_id: Uuid,
    amount: f64,
    platform_fee: f64,
    provider_earning: f64,
    processor_intent_id: String,
    client_secret: String,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            id: row.id,
            mission_id: row.mission_id,
            payer_id: row.payer_id,
            amount: row.amount,
            platform_fee: row.platform_fee,
            provider_earning: row.provider_earning,
            processor_intent_id: row.processor_intent_id,
            client_secret: row.client_secret,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    mission_id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            mission_id: row.mission_id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            content: row.content,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RatingRow {
    id: Uuid,
    mission_id: Uuid,
    rater_id: Uuid,
    rated_id: Uuid,
    score: i32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Rating {
            id: row.id,
            mission_id: row.mission_id,
            rater_id: row.rater_id,
            rated_id: row.rated_id,
            score: row.score,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    kind: NotificationKind,
    title: String,
    body: String,
    data: serde_json::Value,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            user_id: row.user_id,
            kind: row.kind,
            title: row.title,
            body: row.body,
            data: row.data,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}
