//! Payment models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Payment record for a completed mission, at most one per mission
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub mission_id: Uuid,
    pub payer_id: Uuid,
    pub amount: f64,
    pub platform_fee: f64,
    pub provider_earning: f64,
    pub processor_intent_id: String,
    pub client_secret: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payment status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// Response DTO for intent creation
#[derive(Debug, Serialize)]
pub struct CreateIntentResponse {
    pub client_secret: String,
    pub payment: Payment,
}

/// Request DTO for payout requests
#[derive(Debug, Deserialize)]
pub struct PayoutRequest {
    pub amount: f64,
}

/// Response DTO for payout requests
#[derive(Debug, Serialize)]
pub struct PayoutResponse {
    pub amount: f64,
    pub remaining_balance: f64,
}

/// Provider earnings summary
#[derive(Debug, Serialize, PartialEq)]
pub struct EarningsSummary {
    pub total_earnings: f64,
    pub paid_earnings: f64,
    pub pending_earnings: f64,
    pub current_balance: f64,
    pub completed_missions: i64,
}

/// Webhook event delivered by the payment processor
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: WebhookIntent,
}

/// The intent object embedded in a webhook event
#[derive(Debug, Deserialize)]
pub struct WebhookIntent {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_event_deserializes() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{"type":"payment_intent.succeeded","data":{"object":{"id":"pi_123","amount":5000}}}"#,
        )
        .unwrap();
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.data.object.id, "pi_123");
    }
}
