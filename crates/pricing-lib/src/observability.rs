//! Observability infrastructure for the pricing service
//!
//! Provides:
//! - Prometheus metrics (prediction latency and counters, lossy-encoding
//!   counters, model load state and version)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_gauge, GaugeVec,
    Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictionMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct PredictionMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    prediction_errors_total: IntCounter,
    unseen_categories_total: IntCounter,
    missing_columns_total: IntCounter,
    model_loaded: IntGauge,
    model_version_info: GaugeVec,
}

impl PredictionMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "price_service_prediction_latency_seconds",
                "Time spent encoding features and running GBDT inference",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "price_service_predictions_total",
                "Total number of successful price predictions"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter!(
                "price_service_prediction_errors_total",
                "Total number of failed price predictions"
            )
            .expect("Failed to register prediction_errors_total"),

            unseen_categories_total: register_int_counter!(
                "price_service_unseen_categories_total",
                "Categories outside the fitted vocabulary, substituted with the default code"
            )
            .expect("Failed to register unseen_categories_total"),

            missing_columns_total: register_int_counter!(
                "price_service_missing_columns_total",
                "Feature columns absent from requests, filled with zero"
            )
            .expect("Failed to register missing_columns_total"),

            model_loaded: register_int_gauge!(
                "price_service_model_loaded",
                "Whether a model bundle is currently loaded (1) or the service is degraded (0)"
            )
            .expect("Failed to register model_loaded"),

            model_version_info: register_gauge_vec!(
                "price_service_model_version_info",
                "Information about the currently loaded model bundle",
                &["version"]
            )
            .expect("Failed to register model_version_info"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct PredictionMetrics {
    // This is just a marker - we use the global instance
    _private: (),
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictionMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictionMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    /// Increment the successful prediction counter
    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    /// Increment the failed prediction counter
    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    /// Count unseen-category substitutions from one encoding pass
    pub fn add_unseen_categories(&self, count: u32) {
        self.inner().unseen_categories_total.inc_by(u64::from(count));
    }

    /// Count missing-column substitutions from one encoding pass
    pub fn add_missing_columns(&self, count: u32) {
        self.inner().missing_columns_total.inc_by(u64::from(count));
    }

    /// Update model load state
    pub fn set_model_loaded(&self, loaded: bool) {
        self.inner().model_loaded.set(i64::from(loaded));
    }

    /// Update model version info
    pub fn set_model_version(&self, version: &str) {
        self.inner().model_version_info.reset();
        self.inner()
            .model_version_info
            .with_label_values(&[version])
            .set(1.0);
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for startup, model loading
/// and prediction events.
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, model_version: &str) {
        info!(
            event = "service_started",
            service = %self.service_name,
            service_version = %version,
            model_version = %model_version,
            "Pricing service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Pricing service shutting down"
        );
    }

    /// Log a successful model bundle load
    pub fn log_model_loaded(&self, model_version: &str, feature_count: usize, r2: f64) {
        info!(
            event = "model_loaded",
            service = %self.service_name,
            model_version = %model_version,
            feature_count = feature_count,
            r2 = r2,
            "Model bundle loaded"
        );
    }

    /// Log a failed model bundle load (service degrades, does not exit)
    pub fn log_model_load_failed(&self, path: &str, error: &str) {
        warn!(
            event = "model_load_failed",
            service = %self.service_name,
            path = %path,
            error = %error,
            "Model bundle not loaded, serving degraded"
        );
    }

    /// Log a prediction served to a client
    pub fn log_prediction(&self, predicted_price: f64, confidence: f64, model_version: &str) {
        info!(
            event = "prediction_served",
            service = %self.service_name,
            predicted_price = predicted_price,
            confidence = confidence,
            model_version = %model_version,
            "Served price prediction"
        );
    }

    /// Log a batch prediction served to a client
    pub fn log_batch_prediction(&self, total_count: usize, model_version: &str) {
        info!(
            event = "batch_prediction_served",
            service = %self.service_name,
            total_count = total_count,
            model_version = %model_version,
            "Served batch price prediction"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_metrics_creation() {
        // The Prometheus registry is global and per-process; metrics are
        // created once and the handle is cloned everywhere else.
        let metrics = PredictionMetrics::new();

        metrics.observe_prediction_latency(0.001);
        metrics.inc_predictions();
        metrics.inc_prediction_errors();
        metrics.add_unseen_categories(1);
        metrics.add_missing_columns(2);
        metrics.set_model_loaded(true);
        metrics.set_model_version("1.0");
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-service");
        assert_eq!(logger.service_name, "test-service");
    }
}
