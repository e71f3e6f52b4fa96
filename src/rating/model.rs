//! Rating models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::UserSummary;

/// A one-per-mission rating left by one party about the other
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Rating {
    pub id: Uuid,
    pub mission_id: Uuid,
    pub rater_id: Uuid,
    pub rated_id: Uuid,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for creating a rating
#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    pub mission_id: Uuid,
    pub score: i32,
    pub comment: Option<String>,
}

/// A rating with its author attached, for profile pages
#[derive(Debug, Serialize)]
pub struct RatingWithRater {
    #[serde(flatten)]
    pub rating: Rating,
    pub rater: Option<UserSummary>,
}
