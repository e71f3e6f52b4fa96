//! Shared fixtures for integration tests: an in-memory store, recording
//! collaborator fakes and user/mission builders.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use taskrunner_server::error::{ApiError, ApiResult};
use taskrunner_server::geo::GeoPoint;
use taskrunner_server::message::MessageService;
use taskrunner_server::mission::{
    CreateMissionRequest, MissionService, ProviderMatcher, Urgency,
};
use taskrunner_server::models::{User, UserRole, UserStatus};
use taskrunner_server::notification::{
    NotificationDispatcher, PushGateway, PushMessage,
};
use taskrunner_server::payment::{
    IntentParams, PaymentProcessor, PaymentService, ProcessorIntent,
};
use taskrunner_server::rating::RatingService;
use taskrunner_server::store::{MemStore, Store};
use taskrunner_server::user::UserService;

pub const COMMISSION_PERCENT: f64 = 15.0;
pub const DEFAULT_RADIUS_KM: f64 = 10.0;
pub const MIN_PAYOUT: f64 = 10.0;

/// Paris city center, the default test origin
pub const ORIGIN: GeoPoint = GeoPoint {
    latitude: 48.8566,
    longitude: 2.3522,
};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point `km` kilometers due north of `from`
pub fn north_of(from: GeoPoint, km: f64) -> GeoPoint {
    GeoPoint::new(
        from.latitude + (km / EARTH_RADIUS_KM).to_degrees(),
        from.longitude,
    )
}

// ===== Collaborator fakes =====

/// Push gateway fake that records every send and can be told to fail
#[derive(Default)]
pub struct RecordingPushGateway {
    pub sent: Mutex<Vec<(String, PushMessage)>>,
    pub fail: AtomicBool,
}

impl RecordingPushGateway {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PushGateway for RecordingPushGateway {
    async fn send(&self, token: &str, message: &PushMessage) -> ApiResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::ExternalService("push gateway down".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), message.clone()));
        Ok(())
    }

    async fn send_multicast(&self, tokens: &[String], message: &PushMessage) -> ApiResult<usize> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::ExternalService("push gateway down".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        for token in tokens {
            sent.push((token.clone(), message.clone()));
        }
        Ok(tokens.len())
    }
}

/// Payment processor fake with controllable intent status
#[derive(Default)]
pub struct FakeProcessor {
    pub intents: Mutex<Vec<(String, IntentParams)>>,
    pub statuses: Mutex<std::collections::HashMap<String, String>>,
    pub customers_created: AtomicUsize,
    counter: AtomicUsize,
}

impl FakeProcessor {
    pub fn set_status(&self, intent_id: &str, status: &str) {
        self.statuses
            .lock()
            .unwrap()
            .insert(intent_id.to_string(), status.to_string());
    }

    pub fn intent_count(&self) -> usize {
        self.intents.lock().unwrap().len()
    }

    pub fn last_intent(&self) -> (String, IntentParams) {
        self.intents.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl PaymentProcessor for FakeProcessor {
    async fn create_customer(
        &self,
        _email: &str,
        _name: &str,
        _user_id: Uuid,
    ) -> ApiResult<String> {
        let n = self.customers_created.fetch_add(1, Ordering::SeqCst);
        Ok(format!("cus_test_{}", n))
    }

    async fn create_intent(&self, params: IntentParams) -> ApiResult<ProcessorIntent> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let id = format!("pi_test_{}", n);
        self.intents.lock().unwrap().push((id.clone(), params));
        self.statuses
            .lock()
            .unwrap()
            .insert(id.clone(), "requires_payment_method".to_string());
        Ok(ProcessorIntent {
            client_secret: format!("{}_secret", id),
            id,
            status: "requires_payment_method".to_string(),
        })
    }

    async fn retrieve_intent(&self, intent_id: &str) -> ApiResult<ProcessorIntent> {
        let statuses = self.statuses.lock().unwrap();
        let status = statuses
            .get(intent_id)
            .cloned()
            .ok_or_else(|| ApiError::ExternalService("unknown intent".to_string()))?;
        Ok(ProcessorIntent {
            id: intent_id.to_string(),
            client_secret: format!("{}_secret", intent_id),
            status,
        })
    }
}

// ===== Test application =====

/// All services wired over a shared in-memory store
pub struct TestApp {
    pub store: Arc<MemStore>,
    pub gateway: Arc<RecordingPushGateway>,
    pub processor: Arc<FakeProcessor>,
    pub missions: MissionService,
    pub matcher: Arc<ProviderMatcher>,
    pub payments: PaymentService,
    pub messages: MessageService,
    pub ratings: RatingService,
    pub users: UserService,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemStore::new());
        let store_dyn: Arc<dyn Store> = store.clone();
        let gateway = Arc::new(RecordingPushGateway::default());
        let processor = Arc::new(FakeProcessor::default());

        let matcher = Arc::new(ProviderMatcher::new(store_dyn.clone(), DEFAULT_RADIUS_KM));
        let missions = MissionService::new(store_dyn.clone(), matcher.clone(), COMMISSION_PERCENT);
        let payments = PaymentService::new(
            store_dyn.clone(),
            processor.clone(),
            "eur".to_string(),
            MIN_PAYOUT,
        );
        let messages = MessageService::new(store_dyn.clone());
        let ratings = RatingService::new(store_dyn.clone());
        let users = UserService::new(store_dyn.clone());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store_dyn.clone(),
            gateway.clone(),
        ));

        Self {
            store,
            gateway,
            processor,
            missions,
            matcher,
            payments,
            messages,
            ratings,
            users,
            dispatcher,
        }
    }

    pub async fn seed_user(&self, user: &User) {
        self.store.insert_user(user).await.unwrap();
    }

    pub async fn balance_of(&self, user_id: Uuid) -> f64 {
        self.store.get_user(user_id).await.unwrap().unwrap().balance
    }
}

// ===== Builders =====

pub fn user(role: UserRole) -> User {
    let id = Uuid::new_v4();
    User {
        id,
        email: format!("{}@example.com", id.simple()),
        first_name: "Alex".to_string(),
        last_name: "Martin".to_string(),
        phone: None,
        profile_picture: None,
        role,
        status: UserStatus::Active,
        current_location: None,
        is_available: false,
        service_radius_km: None,
        balance: 0.0,
        average_rating: 0.0,
        total_ratings: 0,
        push_token: None,
        processor_customer_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn client() -> User {
    user(UserRole::Client)
}

/// An available provider at a location, reachable for push
pub fn provider_at(location: GeoPoint, service_radius_km: Option<f64>) -> User {
    let mut provider = user(UserRole::Provider);
    provider.current_location = Some(location);
    provider.is_available = true;
    provider.service_radius_km = service_radius_km;
    provider.push_token = Some(format!("token-{}", provider.id.simple()));
    provider
}

pub fn provider() -> User {
    provider_at(ORIGIN, None)
}

/// A create-mission request with pickup at `pickup`
pub fn mission_request(price: f64, pickup: GeoPoint) -> CreateMissionRequest {
    CreateMissionRequest {
        title: "Grocery run".to_string(),
        description: "Pick up groceries from the market".to_string(),
        category: "shopping".to_string(),
        pickup_address: "1 rue de Rivoli, Paris".to_string(),
        pickup_latitude: Some(pickup.latitude),
        pickup_longitude: Some(pickup.longitude),
        delivery_address: None,
        delivery_latitude: None,
        delivery_longitude: None,
        urgency: Urgency::Medium,
        client_price: price,
        estimated_duration_minutes: Some(45),
        notes: None,
    }
}
