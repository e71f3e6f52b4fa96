//! User and notification route definitions

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/me", get(get_profile))
        .route("/api/users/me/location", put(update_location))
        .route("/api/users/me/availability", put(update_availability))
        .route("/api/users/me/push-token", put(update_push_token))
        .route("/api/notifications", get(list_notifications))
        .route("/api/messages/unread-count", get(unread_count))
}
