//! Rating-related API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::rating::{CreateRatingRequest, Rating, RatingWithRater};
use crate::state::AppState;

/// Rate the other party of a completed mission
pub async fn create_rating(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateRatingRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Rating>>)> {
    let rating = state
        .rating_service
        .create(
            user.user_id,
            request.mission_id,
            request.score,
            request.comment,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(rating))))
}

/// Ratings received by a user
pub async fn list_user_ratings(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<RatingWithRater>>>> {
    let ratings = state.rating_service.list_for_user(user_id).await?;

    Ok(Json(ApiResponse::ok(ratings)))
}
