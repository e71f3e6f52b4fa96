//! Payment settlement service
//!
//! Orchestrates the post-completion money flow: intent creation with the
//! external processor, confirmation and provider crediting, payout
//! bookkeeping and webhook routing. Processor failures here propagate to
//! the caller; payment correctness is never silently swallowed.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{authorize, Action, Relation};
use crate::error::{ApiError, ApiResult};
use crate::fees::round_money;
use crate::mission::{Mission, MissionStatus};
use crate::models::User;
use crate::notification::{Notice, NotificationKind};
use crate::store::Store;

use super::model::{
    CreateIntentResponse, EarningsSummary, Payment, PaymentStatus, PayoutResponse, WebhookEvent,
};
use super::processor::{IntentParams, PaymentProcessor};

/// Webhook event types the processor emits
const EVENT_INTENT_SUCCEEDED: &str = "payment_intent.succeeded";
const EVENT_INTENT_FAILED: &str = "payment_intent.payment_failed";

pub struct PaymentService {
    store: Arc<dyn Store>,
    processor: Arc<dyn PaymentProcessor>,
    currency: String,
    min_payout_amount: f64,
}

impl PaymentService {
    pub fn new(
        store: Arc<dyn Store>,
        processor: Arc<dyn PaymentProcessor>,
        currency: String,
        min_payout_amount: f64,
    ) -> Self {
        Self {
            store,
            processor,
            currency,
            min_payout_amount,
        }
    }

    /// Create a payment intent for a completed mission
    pub async fn create_intent(
        &self,
        mission_id: Uuid,
        client_id: Uuid,
    ) -> ApiResult<CreateIntentResponse> {
        let client = self.user(client_id).await?;
        let mission = self.mission(mission_id).await?;
        authorize(
            Action::CreateIntent,
            client.role,
            Relation::to_mission(&mission, client_id),
        )?;

        if mission.status != MissionStatus::Completed {
            return Err(ApiError::Conflict(
                "Mission must be completed before payment".to_string(),
            ));
        }

        if self.store.get_payment_by_mission(mission_id).await?.is_some() {
            return Err(ApiError::Conflict(
                "Payment already exists for this mission".to_string(),
            ));
        }

        let customer_id = self.customer_for(&client).await?;

        // The processor works in minor currency units
        let amount_minor = (mission.client_price * 100.0).round() as i64;

        let intent = self
            .processor
            .create_intent(IntentParams {
                amount_minor,
                currency: self.currency.clone(),
                customer_id,
                description: format!("Payment for mission: {}", mission.title),
                mission_id: mission.id,
                client_id: mission.client_id,
                provider_id: mission.provider_id(),
            })
            .await?;

        let now = Utc::now();
        let payment = Payment {
            id: Uuid::new_v4(),
            mission_id,
            payer_id: client_id,
            amount: mission.client_price,
            platform_fee: mission.platform_fee,
            provider_earning: mission.provider_earning,
            processor_intent_id: intent.id,
            client_secret: intent.client_secret,
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_payment(&payment).await?;

        tracing::info!(mission_id = %mission_id, payment_id = %payment.id, "Payment intent created");

        Ok(CreateIntentResponse {
            client_secret: payment.client_secret.clone(),
            payment,
        })
    }

    /// Confirm a payment after the processor reports the intent as
    /// succeeded, crediting the provider's balance exactly once
    pub async fn confirm(&self, payment_id: Uuid) -> ApiResult<(Payment, Vec<Notice>)> {
        let payment = self
            .store
            .get_payment(payment_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

        if payment.status == PaymentStatus::Completed {
            return Err(ApiError::Conflict("Payment already completed".to_string()));
        }

        let intent = self
            .processor
            .retrieve_intent(&payment.processor_intent_id)
            .await?;

        if !intent.is_succeeded() {
            return Err(ApiError::Validation("Payment not succeeded".to_string()));
        }

        // Conditional flip guards against a confirmation racing a webhook:
        // only the caller that moves PENDING -> COMPLETED credits the
        // provider.
        if !self.store.complete_payment_if_pending(payment_id).await? {
            return Err(ApiError::Conflict("Payment already completed".to_string()));
        }

        let mission = self.mission(payment.mission_id).await?;

        let mut notices = Vec::new();
        if let Some(provider_id) = mission.provider_id() {
            self.store
                .credit_balance(provider_id, payment.provider_earning)
                .await?;

            tracing::info!(
                payment_id = %payment_id,
                provider_id = %provider_id,
                amount = payment.provider_earning,
                "Provider credited"
            );

            if let Some(provider) = self.store.get_user(provider_id).await? {
                notices.push(Notice::new(
                    provider.id,
                    provider.push_token.clone(),
                    NotificationKind::PaymentReceived,
                    "Payment received",
                    format!("You received {}€", payment.provider_earning),
                    serde_json::json!({ "mission_id": payment.mission_id }),
                ));
            }
        }

        let confirmed = Payment {
            status: PaymentStatus::Completed,
            updated_at: Utc::now(),
            ..payment
        };

        Ok((confirmed, notices))
    }

    /// Deduct a payout from a provider's balance. The transfer itself is
    /// delegated to the processor; only the bookkeeping lives here.
    pub async fn request_payout(
        &self,
        provider_id: Uuid,
        amount: f64,
    ) -> ApiResult<PayoutResponse> {
        let provider = self.user(provider_id).await?;
        authorize(Action::RequestPayout, provider.role, Relation::None)?;

        if amount < self.min_payout_amount {
            return Err(ApiError::Validation(format!(
                "Minimum payout amount is {}€",
                self.min_payout_amount
            )));
        }

        if !self.store.debit_balance(provider_id, amount).await? {
            return Err(ApiError::Validation("Insufficient balance".to_string()));
        }

        let remaining = self.user(provider_id).await?.balance;

        tracing::info!(provider_id = %provider_id, amount, "Payout requested");

        Ok(PayoutResponse {
            amount,
            remaining_balance: round_money(remaining),
        })
    }

    /// Route a processor webhook event. Unknown event types are ignored.
    pub async fn handle_webhook_event(&self, event: WebhookEvent) -> ApiResult<Vec<Notice>> {
        match event.event_type.as_str() {
            EVENT_INTENT_SUCCEEDED => {
                let intent_id = &event.data.object.id;
                match self.store.get_payment_by_intent(intent_id).await? {
                    Some(payment) if payment.status == PaymentStatus::Pending => {
                        let (_, notices) = self.confirm(payment.id).await?;
                        Ok(notices)
                    }
                    Some(_) | None => Ok(Vec::new()),
                }
            }
            EVENT_INTENT_FAILED => {
                let intent_id = &event.data.object.id;
                if let Some(payment) = self.store.get_payment_by_intent(intent_id).await? {
                    self.store.mark_payment_failed(payment.id).await?;
                    tracing::warn!(payment_id = %payment.id, "Payment failed");
                }
                Ok(Vec::new())
            }
            other => {
                tracing::info!(event_type = %other, "Ignoring unhandled webhook event");
                Ok(Vec::new())
            }
        }
    }

    /// Earnings summary for a provider
    pub async fn earnings(&self, provider_id: Uuid) -> ApiResult<EarningsSummary> {
        let provider = self.user(provider_id).await?;
        authorize(Action::ViewEarnings, provider.role, Relation::None)?;

        let missions = self
            .store
            .completed_missions_for_provider(provider_id)
            .await?;

        let mut total_earnings = 0.0;
        let mut paid_earnings = 0.0;
        for mission in &missions {
            total_earnings += mission.provider_earning;
            if let Some(payment) = self.store.get_payment_by_mission(mission.id).await? {
                if payment.status == PaymentStatus::Completed {
                    paid_earnings += mission.provider_earning;
                }
            }
        }

        Ok(EarningsSummary {
            total_earnings: round_money(total_earnings),
            paid_earnings: round_money(paid_earnings),
            pending_earnings: round_money(total_earnings - paid_earnings),
            current_balance: round_money(provider.balance),
            completed_missions: missions.len() as i64,
        })
    }

    /// The payment attached to a mission, visible to its parties
    pub async fn get_by_mission(&self, mission_id: Uuid, user_id: Uuid) -> ApiResult<Payment> {
        let caller = self.user(user_id).await?;
        let mission = self.mission(mission_id).await?;
        authorize(
            Action::ViewPayment,
            caller.role,
            Relation::to_mission(&mission, user_id),
        )?;

        self.store
            .get_payment_by_mission(mission_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))
    }

    /// The caller's payment history, newest first
    pub async fn history(&self, user_id: Uuid) -> ApiResult<Vec<Payment>> {
        self.user(user_id).await?;
        self.store.payments_for_user(user_id).await
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

    /// Reuse the client's processor customer, creating one on first use
    async fn customer_for(&self, client: &User) -> ApiResult<String> {
        if let Some(customer_id) = &client.processor_customer_id {
            return Ok(customer_id.clone());
        }

        let customer_id = self
            .processor
            .create_customer(&client.email, &client.full_name(), client.id)
            .await?;

        self.store
            .update_processor_customer(client.id, &customer_id)
            .await?;

        Ok(customer_id)
    }
}
