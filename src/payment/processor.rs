//! Payment processor client
//!
//! The processor holds funds and exposes customer/intent primitives over
//! a Stripe-shaped HTTP API. Amounts cross this boundary in minor
//! currency units.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Request timeout for processor calls
const PROCESSOR_TIMEOUT: Duration = Duration::from_secs(15);

/// Intent status reported as succeeded by the processor
const INTENT_SUCCEEDED: &str = "succeeded";

/// A payment intent as known to the processor
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: String,
    pub status: String,
}

impl ProcessorIntent {
    pub fn is_succeeded(&self) -> bool {
        self.status == INTENT_SUCCEEDED
    }
}

/// Parameters for creating a payment intent
#[derive(Debug, Clone)]
pub struct IntentParams {
    pub amount_minor: i64,
    pub currency: String,
    pub customer_id: String,
    pub description: String,
    pub mission_id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Option<Uuid>,
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a payer reference for a user; returns the customer id
    async fn create_customer(&self, email: &str, name: &str, user_id: Uuid) -> ApiResult<String>;

    /// Request a payment hold for the given amount
    async fn create_intent(&self, params: IntentParams) -> ApiResult<ProcessorIntent>;

    /// Fetch the current state of an intent
    async fn retrieve_intent(&self, intent_id: &str) -> ApiResult<ProcessorIntent>;
}

/// HTTP client for the payment processor API
pub struct HttpPaymentProcessor {
    client: reqwest::Client,
    api_url: String,
    secret_key: String,
}

#[derive(Deserialize)]
struct CustomerResponse {
    id: String,
}

impl HttpPaymentProcessor {
    pub fn new(api_url: String, secret_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(PROCESSOR_TIMEOUT)
            .build()
            .expect("failed to build payment processor client");

        Self {
            client,
            api_url,
            secret_key,
        }
    }

    async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::ExternalService(format!(
                "Payment processor returned {}: {}",
                status, body
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl PaymentProcessor for HttpPaymentProcessor {
    async fn create_customer(&self, email: &str, name: &str, user_id: Uuid) -> ApiResult<String> {
        let response = self
            .client
            .post(format!("{}/customers", self.api_url))
            .bearer_auth(&self.secret_key)
            .form(&[
                ("email", email),
                ("name", name),
                ("metadata[user_id]", &user_id.to_string()),
            ])
            .send()
            .await?;

        let customer: CustomerResponse = Self::check_status(response).await?.json().await?;
        Ok(customer.id)
    }

    async fn create_intent(&self, params: IntentParams) -> ApiResult<ProcessorIntent> {
        let amount = params.amount_minor.to_string();
        let mission_id = params.mission_id.to_string();
        let client_id = params.client_id.to_string();
        let provider_id = params
            .provider_id
            .map(|id| id.to_string())
            .unwrap_or_default();

        let response = self
            .client
            .post(format!("{}/payment_intents", self.api_url))
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount.as_str()),
                ("currency", params.currency.as_str()),
                ("customer", params.customer_id.as_str()),
                ("description", params.description.as_str()),
                ("metadata[mission_id]", mission_id.as_str()),
                ("metadata[client_id]", client_id.as_str()),
                ("metadata[provider_id]", provider_id.as_str()),
            ])
            .send()
            .await?;

        let intent: ProcessorIntent = Self::check_status(response).await?.json().await?;
        Ok(intent)
    }

    async fn retrieve_intent(&self, intent_id: &str) -> ApiResult<ProcessorIntent> {
        let response = self
            .client
            .get(format!("{}/payment_intents/{}", self.api_url, intent_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let intent: ProcessorIntent = Self::check_status(response).await?.json().await?;
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_status_check() {
        let intent = ProcessorIntent {
            id: "pi_1".to_string(),
            client_secret: "pi_1_secret".to_string(),
            status: "succeeded".to_string(),
        };
        assert!(intent.is_succeeded());

        let pending = ProcessorIntent {
            status: "requires_payment_method".to_string(),
            ..intent
        };
        assert!(!pending.is_succeeded());
    }
}
