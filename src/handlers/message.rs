//! Message-related API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::message::{Message, SendMessageRequest, UnreadCount};
use crate::middleware::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::state::AppState;

/// Send a message to the other mission party
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(mission_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Message>>)> {
    let (message, notices) = state
        .message_service
        .send(user.user_id, mission_id, request.content)
        .await?;

    state.dispatcher.spawn_dispatch(notices);

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}

/// Messages of a mission, oldest first
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(mission_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<Message>>>> {
    let messages = state
        .message_service
        .list(mission_id, user.user_id)
        .await?;

    Ok(Json(ApiResponse::ok(messages)))
}

/// Count of the caller's unread messages
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<UnreadCount>>> {
    let unread = state.message_service.unread_count(user.user_id).await?;

    Ok(Json(ApiResponse::ok(UnreadCount { unread })))
}
