//! User profile operations
//!
//! Registration and login live in the external credential service; this
//! module keeps the profile mutations the matcher and dispatcher depend
//! on: location, availability and the push token.

mod service;

pub use service::UserService;

use serde::Deserialize;

/// Request DTO for location updates
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Request DTO for availability updates
#[derive(Debug, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub is_available: bool,
}

/// Request DTO for push token registration; None clears the token
#[derive(Debug, Deserialize)]
pub struct UpdatePushTokenRequest {
    pub push_token: Option<String>,
}
