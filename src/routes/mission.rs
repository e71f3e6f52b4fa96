//! Mission route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn mission_routes() -> Router<AppState> {
    Router::new()
        .route("/api/missions", post(create_mission).get(list_missions))
        .route("/api/missions/nearby", get(nearby_missions))
        .route("/api/missions/:id", get(get_mission))
        .route("/api/missions/:id/accept", post(accept_mission))
        .route("/api/missions/:id/start", post(start_mission))
        .route("/api/missions/:id/complete", post(complete_mission))
        .route("/api/missions/:id/cancel", post(cancel_mission))
        .route(
            "/api/missions/:id/messages",
            post(send_message).get(list_messages),
        )
}
