//! User profile API handlers

use axum::{extract::State, Json};

use crate::error::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::models::{ApiResponse, User};
use crate::notification::Notification;
use crate::state::AppState;
use crate::user::{UpdateAvailabilityRequest, UpdateLocationRequest, UpdatePushTokenRequest};

/// The caller's own profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<User>>> {
    let profile = state.user_service.profile(user.user_id).await?;

    Ok(Json(ApiResponse::ok(profile)))
}

/// Update the caller's current location
pub async fn update_location(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateLocationRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let updated = state
        .user_service
        .update_location(user.user_id, request.latitude, request.longitude)
        .await?;

    Ok(Json(ApiResponse::ok(updated)))
}

/// Toggle the calling provider's availability
pub async fn update_availability(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let updated = state
        .user_service
        .update_availability(user.user_id, request.is_available)
        .await?;

    Ok(Json(ApiResponse::ok(updated)))
}

/// Register or clear the caller's push token
pub async fn update_push_token(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdatePushTokenRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let updated = state
        .user_service
        .update_push_token(user.user_id, request.push_token)
        .await?;

    Ok(Json(ApiResponse::ok(updated)))
}

/// The caller's notification history
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<Vec<Notification>>>> {
    let notifications = state.user_service.notifications(user.user_id).await?;

    Ok(Json(ApiResponse::ok(notifications)))
}
