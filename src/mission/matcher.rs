//! Proximity matching between missions and providers

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{authorize, Action, Relation};
use crate::error::{ApiError, ApiResult};
use crate::geo::{distance_km, GeoPoint};
use crate::mission::{Mission, NearbyMission};
use crate::models::{User, UserSummary};
use crate::store::Store;

/// Pure proximity queries over the store, layered on the haversine
/// distance
pub struct ProviderMatcher {
    store: Arc<dyn Store>,
    default_radius_km: f64,
}

impl ProviderMatcher {
    pub fn new(store: Arc<dyn Store>, default_radius_km: f64) -> Self {
        Self {
            store,
            default_radius_km,
        }
    }

    /// Pending missions within `radius_km` of the given point, nearest
    /// first. Ties keep mission creation order (stable sort over a
    /// creation-ordered fetch).
    pub async fn find_nearby_missions(
        &self,
        provider_id: Uuid,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> ApiResult<Vec<NearbyMission>> {
        let provider = self
            .store
            .get_user(provider_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        authorize(Action::BrowseNearbyMissions, provider.role, Relation::None)?;

        let radius = radius_km.unwrap_or(self.default_radius_km);
        let origin = GeoPoint::new(latitude, longitude);

        let mut matches: Vec<(Mission, f64)> = self
            .store
            .pending_missions_with_pickup()
            .await?
            .into_iter()
            .filter_map(|mission| {
                let pickup = mission.pickup_location?;
                let distance = distance_km(origin, pickup);
                (distance <= radius).then_some((mission, distance))
            })
            .collect();

        matches.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        // Attach client summaries, fetching each client once
        let mut clients: HashMap<Uuid, Option<UserSummary>> = HashMap::new();
        let mut results = Vec::with_capacity(matches.len());
        for (mission, distance) in matches {
            let client = match clients.get(&mission.client_id) {
                Some(summary) => summary.clone(),
                None => {
                    let summary = self
                        .store
                        .get_user(mission.client_id)
                        .await?
                        .map(|u| UserSummary::from(&u));
                    clients.insert(mission.client_id, summary.clone());
                    summary
                }
            };
            results.push(NearbyMission {
                mission,
                client,
                distance_km: distance,
            });
        }

        Ok(results)
    }

    /// Providers eligible for the new-mission fan-out: active, available,
    /// reachable, and within their own configured service radius of the
    /// mission pickup point.
    ///
    /// Note the asymmetry with [`Self::find_nearby_missions`]: the
    /// provider-facing browse uses the caller-supplied radius, while the
    /// fan-out here is governed by each provider's service radius.
    /// TODO(product): clarify whether both checks should share one radius
    /// source.
    pub async fn find_nearby_providers(&self, mission: &Mission) -> ApiResult<Vec<User>> {
        let Some(pickup) = mission.pickup_location else {
            return Ok(Vec::new());
        };

        let providers = self.store.available_providers().await?;

        Ok(providers
            .into_iter()
            .filter(|provider| match provider.current_location {
                Some(location) => {
                    let radius = provider.service_radius_km.unwrap_or(self.default_radius_km);
                    distance_km(pickup, location) <= radius
                }
                None => false,
            })
            .collect())
    }
}
