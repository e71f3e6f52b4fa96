//! TaskRunner Marketplace Backend Server
//!
//! Main entry point for the TaskRunner backend: a two-sided task
//! marketplace where clients post paid missions, nearby providers accept
//! and fulfill them, and payment is split between platform and provider.

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use taskrunner_server::config::Config;
use taskrunner_server::db;
use taskrunner_server::message::MessageService;
use taskrunner_server::middleware::{self, AuthVerifier};
use taskrunner_server::mission::{MissionService, ProviderMatcher};
use taskrunner_server::notification::{
    HttpPushGateway, NotificationDispatcher, NullPushGateway, PushGateway,
};
use taskrunner_server::payment::{HttpPaymentProcessor, PaymentService};
use taskrunner_server::rating::RatingService;
use taskrunner_server::routes;
use taskrunner_server::state::AppState;
use taskrunner_server::store::{PgStore, Store};
use taskrunner_server::user::UserService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    // Database pool and migrations
    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));

    // External collaborators
    let gateway: Arc<dyn PushGateway> =
        match (&config.push_gateway_url, &config.push_gateway_key) {
            (Some(url), Some(key)) => Arc::new(HttpPushGateway::new(url.clone(), key.clone())),
            _ => {
                tracing::warn!("Push gateway not configured, notifications will not be delivered");
                Arc::new(NullPushGateway)
            }
        };
    let processor = Arc::new(HttpPaymentProcessor::new(
        config.processor_api_url.clone(),
        config.processor_secret_key.clone(),
    ));

    // Services
    let dispatcher = Arc::new(NotificationDispatcher::new(store.clone(), gateway));
    let matcher = Arc::new(ProviderMatcher::new(
        store.clone(),
        config.default_radius_km,
    ));
    let mission_service = Arc::new(MissionService::new(
        store.clone(),
        matcher.clone(),
        config.commission_percent,
    ));
    let payment_service = Arc::new(PaymentService::new(
        store.clone(),
        processor,
        config.currency.clone(),
        config.min_payout_amount,
    ));
    let message_service = Arc::new(MessageService::new(store.clone()));
    let rating_service = Arc::new(RatingService::new(store.clone()));
    let user_service = Arc::new(UserService::new(store.clone()));
    let auth_verifier = Arc::new(AuthVerifier::new(config.jwt_secret.clone()));

    let app_state = AppState {
        mission_service,
        matcher,
        payment_service,
        message_service,
        rating_service,
        user_service,
        dispatcher,
        auth_verifier,
        webhook_secret: config.webhook_secret.clone(),
    };

    // Clone pool for the health check
    let health_pool = pool.clone();

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(move || health_check(health_pool.clone())))
        .merge(routes::mission_routes())
        .merge(routes::payment_routes())
        .merge(routes::rating_routes())
        .merge(routes::user_routes())
        .with_state(app_state)
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(configure_cors(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn root() -> &'static str {
    "TaskRunner Marketplace API"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    version: String,
}

/// Health check endpoint
async fn health_check(pool: sqlx::PgPool) -> axum::Json<HealthResponse> {
    let database = match db::check_health(&pool).await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if database == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(config: &Config) -> CorsLayer {
    let Some(allowed) = config.cors_allowed_origins.as_deref() else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = allowed
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
