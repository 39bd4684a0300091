//! Health status reporting for the pricing service
//!
//! The service has a single health-determining component: the predictor.
//! It is healthy when a model bundle is loaded and degraded otherwise;
//! a degraded service still answers requests, it just cannot predict.

use crate::predictor::PricePredictor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overall service status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Model loaded, predictions available
    Healthy,
    /// Running without a model; predictions unavailable
    Degraded,
}

/// Health check response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub model_loaded: bool,
    pub model_metrics: Option<BTreeMap<String, f64>>,
}

impl HealthResponse {
    /// Derive the health response from the predictor's load state
    pub fn from_predictor(predictor: &PricePredictor) -> Self {
        if predictor.is_loaded() {
            Self {
                status: ServiceStatus::Healthy,
                model_loaded: true,
                model_metrics: Some(predictor.metrics()),
            }
        } else {
            Self {
                status: ServiceStatus::Degraded,
                model_loaded: false,
                model_metrics: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unloaded_predictor_reports_degraded() {
        let health = HealthResponse::from_predictor(&PricePredictor::unloaded());

        assert_eq!(health.status, ServiceStatus::Degraded);
        assert!(!health.model_loaded);
        assert!(health.model_metrics.is_none());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let health = HealthResponse {
            status: ServiceStatus::Degraded,
            model_loaded: false,
            model_metrics: None,
        };
        let json = serde_json::to_value(&health).unwrap();

        assert_eq!(json["status"], "degraded");
        assert_eq!(json["model_loaded"], false);
        assert!(json["model_metrics"].is_null());
    }
}
