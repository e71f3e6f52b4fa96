//! Mission-related API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::mission::{
    CreateMissionRequest, ListMissionsQuery, Mission, MissionDetail, NearbyMission,
    NearbyMissionsQuery,
};
use crate::models::ApiResponse;
use crate::state::AppState;

/// Create a new mission and fan out alerts to nearby providers
pub async fn create_mission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateMissionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Mission>>)> {
    let (mission, notices) = state.mission_service.create(user.user_id, request).await?;

    state.dispatcher.spawn_dispatch(notices);

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(mission))))
}

/// List the caller's missions
pub async fn list_missions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListMissionsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Mission>>>> {
    let missions = state
        .mission_service
        .list_for_user(user.user_id, query.status)
        .await?;

    Ok(Json(ApiResponse::ok(missions)))
}

/// Pending missions near the calling provider
pub async fn nearby_missions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<NearbyMissionsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<NearbyMission>>>> {
    let missions = state
        .matcher
        .find_nearby_missions(user.user_id, query.latitude, query.longitude, query.radius_km)
        .await?;

    Ok(Json(ApiResponse::ok(missions)))
}

/// Full mission detail for one of its parties
pub async fn get_mission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(mission_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MissionDetail>>> {
    let detail = state.mission_service.get(mission_id, user.user_id).await?;

    Ok(Json(ApiResponse::ok(detail)))
}

/// Accept a pending mission
pub async fn accept_mission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(mission_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Mission>>> {
    let (mission, notices) = state
        .mission_service
        .accept(mission_id, user.user_id)
        .await?;

    state.dispatcher.spawn_dispatch(notices);

    Ok(Json(ApiResponse::ok(mission)))
}

/// Start an accepted mission
pub async fn start_mission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(mission_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Mission>>> {
    let (mission, notices) = state
        .mission_service
        .start(mission_id, user.user_id)
        .await?;

    state.dispatcher.spawn_dispatch(notices);

    Ok(Json(ApiResponse::ok(mission)))
}

/// Complete a mission in progress
pub async fn complete_mission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(mission_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Mission>>> {
    let (mission, notices) = state
        .mission_service
        .complete(mission_id, user.user_id)
        .await?;

    state.dispatcher.spawn_dispatch(notices);

    Ok(Json(ApiResponse::ok(mission)))
}

/// Cancel a mission from any non-terminal state
pub async fn cancel_mission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(mission_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Mission>>> {
    let (mission, notices) = state
        .mission_service
        .cancel(mission_id, user.user_id)
        .await?;

    state.dispatcher.spawn_dispatch(notices);

    Ok(Json(ApiResponse::ok(mission)))
}
