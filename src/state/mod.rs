//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::message::MessageService;
use crate::middleware::AuthVerifier;
use crate::mission::{MissionService, ProviderMatcher};
use crate::notification::NotificationDispatcher;
use crate::payment::PaymentService;
use crate::rating::RatingService;
use crate::user::UserService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub mission_service: Arc<MissionService>,
    pub matcher: Arc<ProviderMatcher>,
    pub payment_service: Arc<PaymentService>,
    pub message_service: Arc<MessageService>,
    pub rating_service: Arc<RatingService>,
    pub user_service: Arc<UserService>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub auth_verifier: Arc<AuthVerifier>,
    pub webhook_secret: Option<String>,
}

impl FromRef<AppState> for Arc<AuthVerifier> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_verifier.clone()
    }
}
