//! Payment route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/payments/intent", post(create_payment_intent))
        .route("/api/payments/:id/confirm", post(confirm_payment))
        .route("/api/payments/webhook", post(payment_webhook))
        .route("/api/payments/earnings", get(get_earnings))
        .route("/api/payments/payout", post(request_payout))
        .route("/api/payments/history", get(payment_history))
        .route("/api/payments/mission/:id", get(get_mission_payment))
}
