//! Price Service - ML-powered flight ticket price prediction
//!
//! Loads a trained model bundle once at startup and serves price
//! predictions over HTTP. Runs degraded (no prediction capability)
//! when the bundle is missing instead of refusing to start.

use anyhow::Result;
use price_service::{api, config};
use pricing_lib::{PredictionMetrics, PricePredictor, StructuredLogger};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting price-service");

    // Load configuration
    let config = config::ServiceConfig::load()?;
    info!(model_path = %config.model_path, api_port = config.api_port, "Service configured");

    // Initialize structured logger and metrics
    let logger = StructuredLogger::new("price-service");
    let metrics = PredictionMetrics::new();

    // Load the model bundle once; never reloaded for the process lifetime
    let predictor = Arc::new(PricePredictor::from_path(Path::new(&config.model_path)));
    metrics.set_model_loaded(predictor.is_loaded());
    metrics.set_model_version(predictor.model_version());

    if predictor.is_loaded() {
        logger.log_model_loaded(
            predictor.model_version(),
            predictor.metrics().len(),
            predictor.confidence(),
        );
    } else {
        logger.log_model_load_failed(&config.model_path, "bundle missing or unreadable");
    }

    logger.log_startup(SERVICE_VERSION, predictor.model_version());

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(predictor, metrics, logger.clone()));

    // Start the API server
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    api_handle.abort();
    Ok(())
}
