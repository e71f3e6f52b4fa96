//! Mission lifecycle service
//!
//! The state machine at the heart of the marketplace:
//! PENDING -> ACCEPTED -> IN_PROGRESS -> COMPLETED, with CANCELLED
//! reachable from every non-terminal state. Transitions are guarded by
//! the authorization policy and by status-conditioned store updates, so
//! contended operations (two providers racing to accept) resolve to
//! exactly one winner.
//!
//! Operations return the notices to dispatch instead of pushing inline;
//! the caller hands them to the dispatcher once the transition has
//! committed.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{authorize, Action, Relation};
use crate::error::{ApiError, ApiResult};
use crate::fees::FeeSplit;
use crate::models::{User, UserRole, UserSummary};
use crate::notification::{Notice, NotificationKind};
use crate::store::Store;

use super::matcher::ProviderMatcher;
use super::model::{
    Assignment, CreateMissionRequest, Mission, MissionDetail, MissionStatus,
};

pub struct MissionService {
    store: Arc<dyn Store>,
    matcher: Arc<ProviderMatcher>,
    commission_percent: f64,
}

impl MissionService {
    pub fn new(
        store: Arc<dyn Store>,
        matcher: Arc<ProviderMatcher>,
        commission_percent: f64,
    ) -> Self {
        Self {
            store,
            matcher,
            commission_percent,
        }
    }

    /// Create a mission and compute the new-mission fan-out
    pub async fn create(
        &self,
        client_id: Uuid,
        request: CreateMissionRequest,
    ) -> ApiResult<(Mission, Vec<Notice>)> {
        let client = self.user(client_id).await?;
        authorize(Action::CreateMission, client.role, Relation::None)?;

        request.validate()?;

        let split = FeeSplit::calculate(request.client_price, self.commission_percent);
        let now = Utc::now();

        let mission = Mission {
            id: Uuid::new_v4(),
            client_id,
            title: request.title.clone(),
            description: request.description.clone(),
            category: request.category.clone(),
            pickup_address: request.pickup_address.clone(),
            pickup_location: request.pickup_location(),
            delivery_address: request.delivery_address.clone(),
            delivery_location: request.delivery_location(),
            urgency: request.urgency,
            client_price: request.client_price,
            platform_fee: split.platform_fee,
            provider_earning: split.provider_earning,
            status: MissionStatus::Pending,
            assignment: Assignment::Unassigned,
            started_at: None,
            completed_at: None,
            estimated_duration_minutes: request.estimated_duration_minutes,
            notes: request.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        self.store.insert_mission(&mission).await?;

        tracing::info!(mission_id = %mission.id, client_id = %client_id, "Mission created");

        let notices = self.fan_out_notices(&mission).await?;

        Ok((mission, notices))
    }

    /// Accept a pending mission. The store update is conditioned on the
    /// mission still being PENDING, so of two concurrent acceptors
    /// exactly one wins and the other gets a conflict.
    pub async fn accept(
        &self,
        mission_id: Uuid,
        provider_id: Uuid,
    ) -> ApiResult<(Mission, Vec<Notice>)> {
        let provider = self.user(provider_id).await?;
        authorize(Action::AcceptMission, provider.role, Relation::None)?;

        // Existence check up front so an unknown id is NOT_FOUND, not a
        // lost race.
        let mission = self.mission(mission_id).await?;

        let accepted = self
            .store
            .accept_mission_if_pending(mission_id, provider_id, Utc::now())
            .await?
            .ok_or_else(|| ApiError::Conflict("Mission is not available".to_string()))?;

        tracing::info!(mission_id = %mission_id, provider_id = %provider_id, "Mission accepted");

        let client = self.store.get_user(mission.client_id).await?;
        let notices = client
            .map(|client| {
                vec![Notice::new(
                    client.id,
                    client.push_token.clone(),
                    NotificationKind::MissionAccepted,
                    "Mission accepted",
                    format!("{} accepted your mission", provider.first_name),
                    serde_json::json!({ "mission_id": mission_id }),
                )]
            })
            .unwrap_or_default();

        Ok((accepted, notices))
    }

    /// Move an accepted mission to IN_PROGRESS
    pub async fn start(
        &self,
        mission_id: Uuid,
        provider_id: Uuid,
    ) -> ApiResult<(Mission, Vec<Notice>)> {
        let caller = self.user(provider_id).await?;
        let mission = self.mission(mission_id).await?;
        authorize(
            Action::StartMission,
            caller.role,
            Relation::to_mission(&mission, provider_id),
        )?;

        let started = self
            .store
            .start_mission_if_accepted(mission_id, Utc::now())
            .await?
            .ok_or_else(|| ApiError::Conflict("Mission must be accepted first".to_string()))?;

        tracing::info!(mission_id = %mission_id, "Mission started");

        let notices = self
            .notice_to_client(
                &started,
                NotificationKind::MissionStarted,
                "Mission started",
                "Your mission has started".to_string(),
            )
            .await?;

        Ok((started, notices))
    }

    /// Complete a mission in progress. Payment is requested separately
    /// through settlement.
    pub async fn complete(
        &self,
        mission_id: Uuid,
        provider_id: Uuid,
    ) -> ApiResult<(Mission, Vec<Notice>)> {
        let caller = self.user(provider_id).await?;
        let mission = self.mission(mission_id).await?;
        authorize(
            Action::CompleteMission,
            caller.role,
            Relation::to_mission(&mission, provider_id),
        )?;

        let completed = self
            .store
            .complete_mission_if_in_progress(mission_id, Utc::now())
            .await?
            .ok_or_else(|| ApiError::Conflict("Mission must be in progress".to_string()))?;

        tracing::info!(mission_id = %mission_id, "Mission completed");

        let notices = self
            .notice_to_client(
                &completed,
                NotificationKind::MissionCompleted,
                "Mission completed",
                "Your mission is complete".to_string(),
            )
            .await?;

        Ok((completed, notices))
    }

    /// Cancel a mission from any non-terminal state
    pub async fn cancel(
        &self,
        mission_id: Uuid,
        user_id: Uuid,
    ) -> ApiResult<(Mission, Vec<Notice>)> {
        let caller = self.user(user_id).await?;
        let mission = self.mission(mission_id).await?;
        authorize(
            Action::CancelMission,
            caller.role,
            Relation::to_mission(&mission, user_id),
        )?;

        match mission.status {
            MissionStatus::Completed => {
                return Err(ApiError::Conflict(
                    "Cannot cancel a completed mission".to_string(),
                ));
            }
            MissionStatus::Cancelled => {
                return Err(ApiError::Conflict(
                    "Mission is already cancelled".to_string(),
                ));
            }
            _ => {}
        }

        let cancelled = self
            .store
            .cancel_mission(mission_id)
            .await?
            .ok_or_else(|| ApiError::Conflict("Mission can no longer be cancelled".to_string()))?;

        tracing::info!(mission_id = %mission_id, cancelled_by = %user_id, "Mission cancelled");

        // Notify the other party, if the mission had one
        let notices = match cancelled.counterparty(user_id) {
            Some(other_id) => match self.store.get_user(other_id).await? {
                Some(other) => vec![Notice::new(
                    other.id,
                    other.push_token.clone(),
                    NotificationKind::MissionCancelled,
                    "Mission cancelled",
                    "The mission has been cancelled".to_string(),
                    serde_json::json!({ "mission_id": mission_id }),
                )],
                None => Vec::new(),
            },
            None => Vec::new(),
        };

        Ok((cancelled, notices))
    }

    /// Full mission detail for one of its parties or an administrator
    pub async fn get(&self, mission_id: Uuid, user_id: Uuid) -> ApiResult<MissionDetail> {
        let caller = self.user(user_id).await?;
        let mission = self.mission(mission_id).await?;
        authorize(
            Action::ViewMission,
            caller.role,
            Relation::to_mission(&mission, user_id),
        )?;

        let client = self
            .store
            .get_user(mission.client_id)
            .await?
            .map(|u| UserSummary::from(&u));
        let provider = match mission.provider_id() {
            Some(id) => self.store.get_user(id).await?.map(|u| UserSummary::from(&u)),
            None => None,
        };
        let messages = self.store.messages_for_mission(mission_id).await?;
        let rating = self.store.get_rating_by_mission(mission_id).await?;
        let payment = self.store.get_payment_by_mission(mission_id).await?;

        Ok(MissionDetail {
            mission,
            client,
            provider,
            messages,
            rating,
            payment,
        })
    }

    /// The caller's missions, newest first: owned for clients, assigned
    /// for providers
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<MissionStatus>,
    ) -> ApiResult<Vec<Mission>> {
        let caller = self.user(user_id).await?;

        match caller.role {
            UserRole::Client => self.store.missions_for_client(user_id, status).await,
            UserRole::Provider => self.store.missions_for_provider(user_id, status).await,
            UserRole::Admin => Err(ApiError::Permission(
                "Administrators browse missions individually".to_string(),
            )),
        }
    }

    // ===== Helpers =====

    async fn user(&self, id: Uuid) -> ApiResult<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    async fn mission(&self, id: Uuid) -> ApiResult<Mission> {
        self.store
            .get_mission(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Mission not found".to_string()))
    }

    async fn notice_to_client(
        &self,
        mission: &Mission,
        kind: NotificationKind,
        title: &str,
        body: String,
    ) -> ApiResult<Vec<Notice>> {
        Ok(self
            .store
            .get_user(mission.client_id)
            .await?
            .map(|client| {
                vec![Notice::new(
                    client.id,
                    client.push_token.clone(),
                    kind,
                    title,
                    body,
                    serde_json::json!({ "mission_id": mission.id }),
                )]
            })
            .unwrap_or_default())
    }

    /// One NEW_MISSION notice per eligible nearby provider
    async fn fan_out_notices(&self, mission: &Mission) -> ApiResult<Vec<Notice>> {
        let providers = self.matcher.find_nearby_providers(mission).await?;

        if !providers.is_empty() {
            tracing::info!(
                mission_id = %mission.id,
                providers = providers.len(),
                "Notifying nearby providers"
            );
        }

        Ok(providers
            .into_iter()
            .map(|provider| {
                Notice::new(
                    provider.id,
                    provider.push_token.clone(),
                    NotificationKind::NewMission,
                    "New mission available",
                    format!("{} - {}€", mission.title, mission.client_price),
                    serde_json::json!({ "mission_id": mission.id }),
                )
            })
            .collect())
    }
}
