//! Rating service
//!
//! One rating per mission, created only after completion; each new rating
//! recomputes the rated user's average. The aggregate update is a plain
//! read-modify-write scoped to the rated user, safe because the unique
//! mission key means a single actor per rating.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{authorize, Action, Relation};
use crate::error::{ApiError, ApiResult};
use crate::fees::round_rating;
use crate::mission::MissionStatus;
use crate::models::UserSummary;
use crate::store::Store;

use super::model::{Rating, RatingWithRater};

pub struct RatingService {
    store: Arc<dyn Store>,
}

impl RatingService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Rate the other party of a completed mission
    pub async fn create(
        &self,
        rater_id: Uuid,
        mission_id: Uuid,
        score: i32,
        comment: Option<String>,
    ) -> ApiResult<Rating> {
        if !(1..=5).contains(&score) {
            return Err(ApiError::Validation(
                "Score must be between 1 and 5".to_string(),
            ));
        }

        let rater = self
            .store
            .get_user(rater_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let mission = self
            .store
            .get_mission(mission_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Mission not found".to_string()))?;
        authorize(
            Action::CreateRating,
            rater.role,
            Relation::to_mission(&mission, rater_id),
        )?;

        if mission.status != MissionStatus::Completed {
            return Err(ApiError::Conflict(
                "Can only rate completed missions".to_string(),
            ));
        }

        if self
            .store
            .get_rating_by_mission(mission_id)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict("Mission already rated".to_string()));
        }

        let rated_id = mission
            .counterparty(rater_id)
            .ok_or_else(|| ApiError::Validation("Cannot rate this mission".to_string()))?;

        let rating = Rating {
            id: Uuid::new_v4(),
            mission_id,
            rater_id,
            rated_id,
            score,
            comment,
            created_at: Utc::now(),
        };

        self.store.insert_rating(&rating).await?;
        self.recompute_aggregate(rated_id).await?;

        tracing::info!(mission_id = %mission_id, rated_id = %rated_id, score, "Rating created");

        Ok(rating)
    }

    /// Ratings received by a user, with their authors, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> ApiResult<Vec<RatingWithRater>> {
        let ratings = self.store.ratings_for_user(user_id).await?;

        let mut results = Vec::with_capacity(ratings.len());
        for rating in ratings {
            let rater = self
                .store
                .get_user(rating.rater_id)
                .await?
                .map(|u| UserSummary::from(&u));
            results.push(RatingWithRater { rating, rater });
        }

        Ok(results)
    }

    /// Recompute a user's average rating (1-decimal) and rating count
    async fn recompute_aggregate(&self, user_id: Uuid) -> ApiResult<()> {
        let ratings = self.store.ratings_for_user(user_id).await?;

        let count = ratings.len() as i32;
        let average = if count > 0 {
            round_rating(ratings.iter().map(|r| r.score as f64).sum::<f64>() / count as f64)
        } else {
            0.0
        };

        self.store
            .update_rating_aggregate(user_id, average, count)
            .await
    }
}
