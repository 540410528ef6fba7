//! Churn Prediction API Server
//!
//! Serves the churn classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CHURN PREDICTION API                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  Router   │  │  Latency  │  │  Artifact Loader        │ │
//! │  │  (Axum)   │  │  Monitor  │  │  (startup)              │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │                ┌─────────────┐                             │
//! │                │ churn-core  │                             │
//! │                └─────────────┘                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod artifacts;
mod config;
mod error;
mod handlers;
mod middleware;

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use churn_core::ChurnService;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};

pub use error::{AppError, AppResult};

const DEFAULT_LOG_FILTER: &str = "churn_server=debug,churn_core=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    init_tracing(config.log_format);

    tracing::info!(
        "Churn Prediction API v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    // Load model artifacts before accepting requests
    let service = ChurnService::default();
    match artifacts::load_bundle(&config.artifact_dir) {
        Ok(bundle) => service.registry().publish(bundle),
        Err(err) => tracing::error!(
            "Failed to load model artifacts: {:#}. Serving without a model",
            err
        ),
    }

    // Build application state
    let state = AppState {
        service: service.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = config.bind().await?;
    let addr = listener.local_addr().context("Listener has no local address")?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // In-flight requests have drained
    if service.registry().clear() {
        tracing::info!("Model bundle released");
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining requests");
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: ChurnService,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        // Probes
        .route("/live", get(handlers::health::live))
        .route("/health", get(handlers::health::check))
        // Predictions
        .route("/predict", post(handlers::predict::predict))
        .route("/predict/batch", post(handlers::predict::predict_batch))
        // Model
        .route("/model/info", get(handlers::model::info))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::latency::track_latency,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
