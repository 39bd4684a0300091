//! HTTP API for price prediction, health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pricing_lib::{
    models::CURRENCY, FeatureRecord, HealthResponse, PredictionMetrics, PredictionResult,
    PricePredictor, StructuredLogger,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<PricePredictor>,
    pub metrics: PredictionMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        predictor: Arc<PricePredictor>,
        metrics: PredictionMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            predictor,
            metrics,
            logger,
        }
    }
}

/// Batch prediction request body
#[derive(Debug, Deserialize)]
pub struct BatchPredictionRequest {
    pub flights: Vec<FeatureRecord>,
}

/// Batch prediction response body
#[derive(Debug, Serialize)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<PredictionResult>,
    pub total_count: usize,
}

/// Root endpoint - liveness info, no business logic
async fn root() -> impl IntoResponse {
    Json(json!({
        "service": "Flight Price Prediction API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Health check - degraded (still 200) when no model bundle is loaded
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse::from_predictor(&state.predictor))
}

/// Single price prediction
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(record): Json<FeatureRecord>,
) -> Response {
    if let Err(reason) = record.validate() {
        return validation_error(&reason);
    }
    if !state.predictor.is_loaded() {
        return model_unavailable();
    }

    let start = Instant::now();
    let predicted = state.predictor.predict(&record);
    state
        .metrics
        .observe_prediction_latency(start.elapsed().as_secs_f64());

    match predicted {
        Some(price) => {
            state.metrics.inc_predictions();
            let result = prediction_result(&state.predictor, price);
            state
                .logger
                .log_prediction(result.predicted_price, result.confidence, &result.model_version);
            (StatusCode::OK, Json(result)).into_response()
        }
        None => {
            state.metrics.inc_prediction_errors();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Prediction failed. Check server logs for details." })),
            )
                .into_response()
        }
    }
}

/// Batch price prediction - order-preserving, one result per input
///
/// A failed individual item yields price 0 instead of aborting the batch.
async fn predict_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchPredictionRequest>,
) -> Response {
    for (index, record) in request.flights.iter().enumerate() {
        if let Err(reason) = record.validate() {
            return validation_error(&format!("flights[{}]: {}", index, reason));
        }
    }
    if !state.predictor.is_loaded() {
        return model_unavailable();
    }

    let start = Instant::now();
    let prices = state.predictor.predict_batch(&request.flights);
    state
        .metrics
        .observe_prediction_latency(start.elapsed().as_secs_f64());

    let predictions: Vec<PredictionResult> = prices
        .into_iter()
        .map(|price| prediction_result(&state.predictor, price))
        .collect();

    let total_count = predictions.len();
    state.metrics.inc_predictions();
    state
        .logger
        .log_batch_prediction(total_count, state.predictor.model_version());

    (
        StatusCode::OK,
        Json(BatchPredictionResponse {
            predictions,
            total_count,
        }),
    )
        .into_response()
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

fn prediction_result(predictor: &PricePredictor, price: f64) -> PredictionResult {
    PredictionResult {
        predicted_price: round_to(price, 2),
        currency: CURRENCY.to_string(),
        confidence: round_to(predictor.confidence(), 4),
        model_version: predictor.model_version().to_string(),
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn validation_error(reason: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": reason })),
    )
        .into_response()
}

fn model_unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "detail": "Model not loaded. Train the model first with price-trainer."
        })),
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/predict/batch", post(predict_batch))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(4523.9172, 2), 4523.92);
        assert_eq!(round_to(0.98765, 4), 0.9877);
        assert_eq!(round_to(0.0, 2), 0.0);
    }
}
