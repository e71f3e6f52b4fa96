//! Mission ratings and user rating aggregates

mod model;
mod service;

pub use model::{CreateRatingRequest, Rating, RatingWithRater};
pub use service::RatingService;
