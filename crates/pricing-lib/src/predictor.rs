//! Price prediction engine
//!
//! The predictor owns an optional model bundle and has exactly two states:
//! unloaded (initial, and terminal when the bundle fails to load) and
//! loaded (terminal otherwise, for the process lifetime). The bundle is
//! never swapped at runtime, so all methods take `&self` and one instance
//! is safely shared by any number of concurrent request handlers.

use crate::bundle::ModelBundle;
use crate::encoder::FeatureEncoder;
use crate::models::FeatureRecord;
use crate::observability::PredictionMetrics;
use gbdt::decision_tree::{Data, DataVec};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, error};

/// Sentinel version reported while no bundle is loaded
const UNLOADED_VERSION: &str = "unloaded";

/// Flight price predictor backed by a fitted GBDT regressor
pub struct PricePredictor {
    bundle: Option<ModelBundle>,
}

impl PricePredictor {
    /// A predictor with no model; every prediction returns `None`
    pub fn unloaded() -> Self {
        Self { bundle: None }
    }

    /// Wrap an already-loaded bundle
    pub fn from_bundle(bundle: ModelBundle) -> Self {
        Self {
            bundle: Some(bundle),
        }
    }

    /// Load a bundle from disk, degrading to unloaded on any failure
    ///
    /// Load failure is not fatal: the service keeps running without
    /// prediction capability and reports itself degraded.
    pub fn from_path(path: &Path) -> Self {
        match ModelBundle::load(path) {
            Ok(bundle) => Self::from_bundle(bundle),
            Err(err) => {
                error!(
                    path = %path.display(),
                    error = %err,
                    "Model bundle unavailable, predictions disabled"
                );
                Self::unloaded()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.bundle.is_some()
    }

    /// Version string of the loaded bundle
    pub fn model_version(&self) -> &str {
        self.bundle
            .as_ref()
            .map(|b| b.model_version.as_str())
            .unwrap_or(UNLOADED_VERSION)
    }

    /// Predict a ticket price for one record
    ///
    /// Returns `None` when no model is loaded or the regressor yields no
    /// output; failures never propagate past this boundary. A successful
    /// prediction is clamped to `>= 0` (prices are non-negative by
    /// domain, not by modeling guarantee).
    pub fn predict(&self, record: &FeatureRecord) -> Option<f64> {
        let bundle = match &self.bundle {
            Some(bundle) => bundle,
            None => {
                error!("Model not loaded");
                return None;
            }
        };

        let (row, stats) = FeatureEncoder::new(bundle).encode(record);
        if stats.unseen_categories > 0 || stats.missing_columns > 0 {
            let metrics = PredictionMetrics::new();
            metrics.add_unseen_categories(stats.unseen_categories);
            metrics.add_missing_columns(stats.missing_columns);
        }

        let input: DataVec = vec![Data::new_test_data(row, None)];
        let predictions = bundle.regressor.predict(&input);

        match predictions.first() {
            Some(&raw) => {
                let price = f64::from(raw).max(0.0);
                debug!(price = price, "Prediction completed");
                Some(price)
            }
            None => {
                error!("Regressor produced no output");
                None
            }
        }
    }

    /// Predict prices for a sequence of records, preserving input order
    ///
    /// A sequential loop over independent single predictions. A failing
    /// item degrades to the literal price `0.0` instead of aborting the
    /// batch.
    pub fn predict_batch(&self, records: &[FeatureRecord]) -> Vec<f64> {
        records
            .iter()
            .map(|record| self.predict(record).unwrap_or(0.0))
            .collect()
    }

    /// Recorded r² score of the loaded bundle, `0.0` when unavailable
    ///
    /// A static training-time value, identical across calls; not a
    /// per-prediction certainty estimate.
    pub fn confidence(&self) -> f64 {
        self.bundle.as_ref().map(|b| b.confidence()).unwrap_or(0.0)
    }

    /// Recorded training metrics, empty when unloaded
    pub fn metrics(&self) -> BTreeMap<String, f64> {
        self.bundle
            .as_ref()
            .map(|b| b.metrics.clone())
            .unwrap_or_default()
    }
}
