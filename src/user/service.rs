//! User profile service

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{authorize, Action, Relation};
use crate::error::{ApiError, ApiResult};
use crate::geo::GeoPoint;
use crate::models::User;
use crate::notification::Notification;
use crate::store::Store;

pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The caller's own record
    pub async fn profile(&self, user_id: Uuid) -> ApiResult<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Update the caller's current location
    pub async fn update_location(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> ApiResult<User> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ApiError::Validation(
                "Coordinates must be finite numbers".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ApiError::Validation(
                "Coordinates out of range".to_string(),
            ));
        }

        self.store
            .update_location(user_id, GeoPoint::new(latitude, longitude))
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Toggle a provider's availability for matching
    pub async fn update_availability(&self, user_id: Uuid, available: bool) -> ApiResult<User> {
        let user = self.profile(user_id).await?;
        authorize(Action::UpdateAvailability, user.role, Relation::None)?;

        self.store
            .update_availability(user_id, available)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Register or clear the caller's notification address
    pub async fn update_push_token(
        &self,
        user_id: Uuid,
        token: Option<String>,
    ) -> ApiResult<User> {
        self.store
            .update_push_token(user_id, token)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// The caller's notification history, newest first
    pub async fn notifications(&self, user_id: Uuid) -> ApiResult<Vec<Notification>> {
        self.store.notifications_for_user(user_id).await
    }
}
