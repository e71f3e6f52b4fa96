//! Route definitions for the TaskRunner API

mod mission;
mod payment;
mod rating;
mod user;

pub use mission::mission_routes;
pub use payment::payment_routes;
pub use rating::rating_routes;
pub use user::user_routes;
