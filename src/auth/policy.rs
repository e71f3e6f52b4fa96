//! Authorization policy table
//!
//! Every service operation evaluates one predicate here before touching
//! state, keyed by (action, caller role, caller relationship to the
//! resource). Keeping the table in one place keeps the role rules
//! reviewable and the services free of scattered checks.

use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::mission::Mission;
use crate::models::UserRole;

/// Operations subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateMission,
    AcceptMission,
    StartMission,
    CompleteMission,
    CancelMission,
    ViewMission,
    BrowseNearbyMissions,
    SendMessage,
    ViewMessages,
    CreateRating,
    CreateIntent,
    ViewPayment,
    ViewEarnings,
    RequestPayout,
    UpdateAvailability,
}

/// The caller's relationship to the resource under access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// No resource involved, or no relationship to it
    None,
    /// Caller owns the mission as its client
    MissionClient,
    /// Caller is the mission's assigned provider
    AssignedProvider,
}

impl Relation {
    /// Derive the caller's relationship to a mission
    pub fn to_mission(mission: &Mission, user_id: Uuid) -> Self {
        if mission.client_id == user_id {
            Relation::MissionClient
        } else if mission.provider_id() == Some(user_id) {
            Relation::AssignedProvider
        } else {
            Relation::None
        }
    }
}

/// Evaluate the policy table; Err(PermissionError) when not allowed
pub fn authorize(action: Action, role: UserRole, relation: Relation) -> ApiResult<()> {
    use Action::*;
    use Relation::*;

    let allowed = match action {
        CreateMission => role == UserRole::Client,
        AcceptMission | BrowseNearbyMissions => role == UserRole::Provider,
        StartMission | CompleteMission => relation == AssignedProvider,
        CancelMission | SendMessage | ViewMessages | CreateRating | ViewPayment => {
            matches!(relation, MissionClient | AssignedProvider)
        }
        ViewMission => {
            matches!(relation, MissionClient | AssignedProvider) || role == UserRole::Admin
        }
        CreateIntent => relation == MissionClient,
        ViewEarnings | RequestPayout | UpdateAvailability => role == UserRole::Provider,
    };

    if allowed {
        Ok(())
    } else {
        Err(ApiError::Permission(denial_message(action).to_string()))
    }
}

fn denial_message(action: Action) -> &'static str {
    match action {
        Action::CreateMission => "Only clients can create missions",
        Action::AcceptMission => "Only providers can accept missions",
        Action::BrowseNearbyMissions => "Only providers can view nearby missions",
        Action::ViewEarnings => "Only providers can view earnings",
        Action::RequestPayout => "Only providers can request payouts",
        Action::UpdateAvailability => "Only providers can update availability",
        _ => "Access denied",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_clients_create_missions() {
        assert!(authorize(Action::CreateMission, UserRole::Client, Relation::None).is_ok());
        assert!(authorize(Action::CreateMission, UserRole::Provider, Relation::None).is_err());
        assert!(authorize(Action::CreateMission, UserRole::Admin, Relation::None).is_err());
    }

    #[test]
    fn test_only_providers_accept() {
        assert!(authorize(Action::AcceptMission, UserRole::Provider, Relation::None).is_ok());
        assert!(authorize(Action::AcceptMission, UserRole::Client, Relation::None).is_err());
    }

    #[test]
    fn test_start_requires_assignment() {
        assert!(authorize(
            Action::StartMission,
            UserRole::Provider,
            Relation::AssignedProvider
        )
        .is_ok());
        assert!(authorize(Action::StartMission, UserRole::Provider, Relation::None).is_err());
    }

    #[test]
    fn test_cancel_allowed_for_both_parties() {
        assert!(authorize(
            Action::CancelMission,
            UserRole::Client,
            Relation::MissionClient
        )
        .is_ok());
        assert!(authorize(
            Action::CancelMission,
            UserRole::Provider,
            Relation::AssignedProvider
        )
        .is_ok());
        assert!(authorize(Action::CancelMission, UserRole::Client, Relation::None).is_err());
    }

    #[test]
    fn test_admins_view_any_mission() {
        assert!(authorize(Action::ViewMission, UserRole::Admin, Relation::None).is_ok());
        assert!(authorize(Action::ViewMission, UserRole::Client, Relation::None).is_err());
    }

    #[test]
    fn test_intent_restricted_to_mission_client() {
        assert!(authorize(
            Action::CreateIntent,
            UserRole::Client,
            Relation::MissionClient
        )
        .is_ok());
        assert!(authorize(
            Action::CreateIntent,
            UserRole::Provider,
            Relation::AssignedProvider
        )
        .is_err());
    }
}
