//! Mission lifecycle and provider matching

mod matcher;
mod model;
mod service;

pub use matcher::ProviderMatcher;
pub use model::{
    Assignment, CreateMissionRequest, ListMissionsQuery, Mission, MissionDetail, MissionStatus,
    NearbyMission, NearbyMissionsQuery, Urgency,
};
pub use service::MissionService;
