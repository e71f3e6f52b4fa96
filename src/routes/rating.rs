//! Rating route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn rating_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ratings", post(create_rating))
        .route("/api/ratings/user/:id", get(list_user_ratings))
}
