//! Payment settlement: intents, confirmation, payouts, webhooks

mod model;
mod processor;
mod service;

pub use model::{
    CreateIntentResponse, EarningsSummary, Payment, PaymentStatus, PayoutRequest, PayoutResponse,
    WebhookEvent, WebhookEventData, WebhookIntent,
};
pub use processor::{HttpPaymentProcessor, IntentParams, PaymentProcessor, ProcessorIntent};
pub use service::PaymentService;
