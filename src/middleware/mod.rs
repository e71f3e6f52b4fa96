//! Middleware for the TaskRunner API

pub mod auth;
mod tracing;

pub use auth::{AuthVerifier, AuthenticatedUser};
pub use tracing::request_tracing;
