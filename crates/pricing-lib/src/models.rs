//! Core data models for the pricing service

use serde::{Deserialize, Serialize};

/// A single flight feature record, one per prediction request
///
/// Field names match the training dataset columns, except `flight_class`
/// which maps to the dataset's `class` column (a reserved word in most
/// client languages, so the API accepts both spellings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub airline: String,
    pub source_city: String,
    pub destination_city: String,
    pub departure_time: String,
    #[serde(default = "default_arrival_time")]
    pub arrival_time: String,
    #[serde(default = "default_stops")]
    pub stops: String,
    #[serde(default = "default_flight_class", alias = "class")]
    pub flight_class: String,
    pub duration: f64,
    #[serde(default = "default_days_left")]
    pub days_left: u32,
}

fn default_arrival_time() -> String {
    "Morning".to_string()
}

fn default_stops() -> String {
    "zero".to_string()
}

fn default_flight_class() -> String {
    "Economy".to_string()
}

fn default_days_left() -> u32 {
    15
}

/// A record field value, either a raw category string or a numeric feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f32),
}

impl FeatureRecord {
    /// Record fields under their canonical training-time column names,
    /// in dataset order. `flight_class` is emitted as `class`.
    pub fn columns(&self) -> [(&'static str, FieldValue<'_>); 9] {
        [
            ("airline", FieldValue::Text(&self.airline)),
            ("source_city", FieldValue::Text(&self.source_city)),
            ("departure_time", FieldValue::Text(&self.departure_time)),
            ("stops", FieldValue::Text(&self.stops)),
            ("arrival_time", FieldValue::Text(&self.arrival_time)),
            ("destination_city", FieldValue::Text(&self.destination_city)),
            ("class", FieldValue::Text(&self.flight_class)),
            ("duration", FieldValue::Number(self.duration as f32)),
            ("days_left", FieldValue::Number(self.days_left as f32)),
        ]
    }

    /// Boundary validation, applied before any encoding
    pub fn validate(&self) -> Result<(), String> {
        if !self.duration.is_finite() {
            return Err("duration must be a finite number".to_string());
        }
        if self.duration < 0.0 {
            return Err("duration must be >= 0".to_string());
        }
        Ok(())
    }
}

/// Prediction output, one per input record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_price: f64,
    pub currency: String,
    pub confidence: f64,
    pub model_version: String,
}

/// Currency of all predicted prices (the training dataset is INR-priced)
pub const CURRENCY: &str = "INR";
