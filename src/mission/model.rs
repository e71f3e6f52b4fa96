//! Mission models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::geo::GeoPoint;
use crate::message::Message;
use crate::models::UserSummary;
use crate::payment::Payment;
use crate::rating::Rating;

/// Mission model
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Mission {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub pickup_address: String,
    pub pickup_location: Option<GeoPoint>,
    pub delivery_address: Option<String>,
    pub delivery_location: Option<GeoPoint>,
    pub urgency: Urgency,
    pub client_price: f64,
    pub platform_fee: f64,
    pub provider_earning: f64,
    pub status: MissionStatus,
    pub assignment: Assignment,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub estimated_duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mission {
    /// The assigned provider, if any
    pub fn provider_id(&self) -> Option<Uuid> {
        match &self.assignment {
            Assignment::Unassigned => None,
            Assignment::Assigned { provider_id, .. } => Some(*provider_id),
        }
    }

    /// Whether the user is the client or the assigned provider
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.client_id == user_id || self.provider_id() == Some(user_id)
    }

    /// The other mission party relative to `user_id`
    pub fn counterparty(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.client_id {
            self.provider_id()
        } else {
            Some(self.client_id)
        }
    }
}

/// Mission lifecycle status
///
/// PENDING -> ACCEPTED -> IN_PROGRESS -> COMPLETED, with CANCELLED
/// reachable from every non-terminal state. COMPLETED and CANCELLED are
/// terminal.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "mission_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

/// Mission urgency levels
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "mission_urgency", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Urgent,
}

/// Provider assignment, structurally tied to the mission status: a mission
/// is `Assigned` exactly while its status is ACCEPTED, IN_PROGRESS or
/// COMPLETED (a CANCELLED mission may retain a stale assignment).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "state", rename_all = "UPPERCASE")]
pub enum Assignment {
    Unassigned,
    Assigned {
        provider_id: Uuid,
        accepted_at: DateTime<Utc>,
    },
}

/// Request DTO for creating a mission
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMissionRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: String,
    #[validate(length(min = 1, message = "pickup address must not be empty"))]
    pub pickup_address: String,
    pub pickup_latitude: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub delivery_address: Option<String>,
    pub delivery_latitude: Option<f64>,
    pub delivery_longitude: Option<f64>,
    pub urgency: Urgency,
    #[validate(range(min = 1.0, message = "client price must be at least 1"))]
    pub client_price: f64,
    pub estimated_duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

impl CreateMissionRequest {
    pub fn pickup_location(&self) -> Option<GeoPoint> {
        match (self.pickup_latitude, self.pickup_longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }

    pub fn delivery_location(&self) -> Option<GeoPoint> {
        match (self.delivery_latitude, self.delivery_longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }
}

/// Query parameters for listing a user's missions
#[derive(Debug, Deserialize)]
pub struct ListMissionsQuery {
    pub status: Option<MissionStatus>,
}

/// Query parameters for the nearby-missions search
#[derive(Debug, Deserialize)]
pub struct NearbyMissionsQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
}

/// A pending mission with its distance from the searching provider
#[derive(Debug, Serialize)]
pub struct NearbyMission {
    #[serde(flatten)]
    pub mission: Mission,
    pub client: Option<UserSummary>,
    pub distance_km: f64,
}

/// Full mission detail with related records
#[derive(Debug, Serialize)]
pub struct MissionDetail {
    #[serde(flatten)]
    pub mission: Mission,
    pub client: Option<UserSummary>,
    pub provider: Option<UserSummary>,
    pub messages: Vec<Message>,
    pub rating: Option<Rating>,
    pub payment: Option<Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateMissionRequest {
        CreateMissionRequest {
            title: "Grocery run".to_string(),
            description: "Pick up groceries".to_string(),
            category: "shopping".to_string(),
            pickup_address: "1 rue de Rivoli, Paris".to_string(),
            pickup_latitude: Some(48.8566),
            pickup_longitude: Some(2.3522),
            delivery_address: None,
            delivery_latitude: None,
            delivery_longitude: None,
            urgency: Urgency::Medium,
            client_price: 25.0,
            estimated_duration_minutes: Some(45),
            notes: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_title() {
        let mut req = request();
        req.title = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_price_below_one() {
        let mut req = request();
        req.client_price = 0.5;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_pickup_location_requires_both_coordinates() {
        let mut req = request();
        req.pickup_longitude = None;
        assert!(req.pickup_location().is_none());
    }
}
