//! API handlers for the TaskRunner backend

pub mod message;
pub mod mission;
pub mod payment;
pub mod rating;
pub mod user;

pub use message::*;
pub use mission::*;
pub use payment::*;
pub use rating::*;
pub use user::*;

// Re-export AuthenticatedUser from middleware for handler use
pub use crate::middleware::AuthenticatedUser;
