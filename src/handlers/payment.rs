//! Payment-related API handlers

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::payment::{
    CreateIntentResponse, EarningsSummary, Payment, PayoutRequest, PayoutResponse, WebhookEvent,
};
use crate::state::AppState;

/// Request body for intent creation
#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub mission_id: Uuid,
}

/// Create a payment intent for a completed mission
pub async fn create_payment_intent(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateIntentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CreateIntentResponse>>)> {
    let response = state
        .payment_service
        .create_intent(request.mission_id, user.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(response))))
}

/// Confirm a payment once the processor reports success
pub async fn confirm_payment(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(payment_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Payment>>> {
    let (payment, notices) = state.payment_service.confirm(payment_id).await?;

    state.dispatcher.spawn_dispatch(notices);

    Ok(Json(ApiResponse::ok(payment)))
}

/// Webhook endpoint for processor events, authenticated by shared secret
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<WebhookEvent>,
) -> ApiResult<Json<ApiResponse<()>>> {
    // Fail-closed: without a configured secret every request is rejected
    match &state.webhook_secret {
        Some(secret) if !secret.is_empty() => {
            let provided = headers
                .get("X-Webhook-Secret")
                .and_then(|h| h.to_str().ok())
                .unwrap_or_default();

            if provided != secret {
                return Err(ApiError::Unauthorized(
                    "Invalid webhook secret".to_string(),
                ));
            }
        }
        _ => {
            tracing::error!("Webhook secret not configured - rejecting request");
            return Err(ApiError::Internal(
                "Webhook endpoint is not configured".to_string(),
            ));
        }
    }

    let notices = state.payment_service.handle_webhook_event(event).await?;

    state.dispatcher.spawn_dispatch(notices);

    Ok(Json(ApiResponse::ok(())))
}

/// Earnings summary for the calling provider
pub async fn get_earnings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<EarningsSummary>>> {
    let summary = state.payment_service.earnings(user.user_id).await?;

    Ok(Json(ApiResponse::ok(summary)))
}

/// Request a payout from the provider balance
pub async fn request_payout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<PayoutRequest>,
) -> ApiResult<Json<ApiResponse<PayoutResponse>>> {
    let response = state
        .payment_service
        .request_payout(user.user_id, request.amount)
        .await?;

    Ok(Json(ApiResponse::ok(response)))
}

/// The payment attached to a mission
pub async fn get_mission_payment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(mission_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Payment>>> {
    let payment = state
        .payment_service
        .get_by_mission(mission_id, user.user_id)
        .await?;

    Ok(Json(ApiResponse::ok(payment)))
}

/// The caller's payment history
pub async fn payment_history(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<Vec<Payment>>>> {
    let payments = state.payment_service.history(user.user_id).await?;

    Ok(Json(ApiResponse::ok(payments)))
}
