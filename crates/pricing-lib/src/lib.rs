//! Library for the flight price prediction service
//!
//! This crate provides the core functionality for:
//! - Model bundle serialization and loading
//! - Feature encoding (categorical label codes, column-order alignment)
//! - Price prediction with a fitted GBDT regressor
//! - Health status reporting and observability

pub mod bundle;
pub mod encoder;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use bundle::{LabelEncoder, ModelBundle, ModelLoadError};
pub use encoder::FeatureEncoder;
pub use health::{HealthResponse, ServiceStatus};
pub use models::{FeatureRecord, FieldValue, PredictionResult};
pub use observability::{PredictionMetrics, StructuredLogger};
pub use predictor::PricePredictor;
