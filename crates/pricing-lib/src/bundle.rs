//! Model bundle serialization and loading
//!
//! A bundle is the single artifact produced by the trainer: a fitted GBDT
//! regressor together with the preprocessing metadata (label encoders,
//! feature column order) and the recorded evaluation metrics. It is
//! written once by the trainer and loaded read-only at service startup.

use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised while loading or saving a model bundle
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model bundle not found at {0}")]
    NotFound(PathBuf),

    #[error("failed to read model bundle: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model bundle: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fixed string-to-integer vocabulary fitted at training time
///
/// Codes are positions in the sorted vocabulary, matching the encoding the
/// trainer applied to the dataset. The vocabulary is never mutated at
/// serving time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit a vocabulary from raw column values (dedup + lexicographic sort)
    pub fn fit<S: AsRef<str>>(values: &[S]) -> Self {
        let mut classes: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Case-sensitive exact lookup of a category's integer code
    pub fn code(&self, value: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }

    /// Number of categories in the fitted vocabulary
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Fitted categories, in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Serialized package of a fitted regressor plus its preprocessing metadata
///
/// Invariant: `feature_columns` is exactly the regressor's training schema,
/// in training order. Columns with an entry in `encoders` are categorical;
/// the rest are numeric.
#[derive(Serialize, Deserialize)]
pub struct ModelBundle {
    pub regressor: GBDT,
    pub encoders: BTreeMap<String, LabelEncoder>,
    pub feature_columns: Vec<String>,
    pub metrics: BTreeMap<String, f64>,
    pub model_version: String,
    pub trained_at: i64,
}

// Manual impl because `GBDT` does not implement `Debug`
impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("encoders", &self.encoders)
            .field("feature_columns", &self.feature_columns)
            .field("metrics", &self.metrics)
            .field("model_version", &self.model_version)
            .field("trained_at", &self.trained_at)
            .finish_non_exhaustive()
    }
}

impl ModelBundle {
    /// Load a bundle from a JSON file
    ///
    /// Never panics past this boundary: a missing, unreadable or corrupt
    /// file comes back as a `ModelLoadError` and the caller decides how to
    /// degrade.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::NotFound(path.to_path_buf()));
        }

        let data = fs::read_to_string(path)?;
        let bundle: ModelBundle = serde_json::from_str(&data)?;

        info!(
            path = %path.display(),
            feature_columns = ?bundle.feature_columns,
            metrics = ?bundle.metrics,
            "Model bundle loaded"
        );

        Ok(bundle)
    }

    /// Serialize the bundle to a JSON file (trainer side)
    pub fn save(&self, path: &Path) -> Result<(), ModelLoadError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Recorded r² score, reused as a static confidence proxy
    pub fn confidence(&self) -> f64 {
        self.metrics.get("r2").copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gbdt::config::Config;

    fn untrained_regressor() -> GBDT {
        GBDT::new(&Config::new())
    }

    #[test]
    fn test_label_encoder_sorted_codes() {
        let encoder = LabelEncoder::fit(&["Vistara", "Indigo", "Air India", "Indigo"]);

        assert_eq!(encoder.len(), 3);
        assert_eq!(encoder.code("Air India"), Some(0));
        assert_eq!(encoder.code("Indigo"), Some(1));
        assert_eq!(encoder.code("Vistara"), Some(2));
    }

    #[test]
    fn test_label_encoder_unseen_category() {
        let encoder = LabelEncoder::fit(&["Economy", "Business"]);
        assert_eq!(encoder.code("First"), None);
    }

    #[test]
    fn test_label_encoder_case_sensitive() {
        let encoder = LabelEncoder::fit(&["Economy"]);
        assert_eq!(encoder.code("economy"), None);
        assert_eq!(encoder.code("Economy"), Some(0));
    }

    #[test]
    fn test_load_missing_bundle_is_not_found() {
        let err = ModelBundle::load(Path::new("/nonexistent/price_model.json")).unwrap_err();
        assert!(matches!(err, ModelLoadError::NotFound(_)));
    }

    #[test]
    fn test_load_corrupt_bundle_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price_model.json");
        fs::write(&path, "not a bundle").unwrap();

        let err = ModelBundle::load(&path).unwrap_err();
        assert!(matches!(err, ModelLoadError::Parse(_)));
    }

    #[test]
    fn test_confidence_defaults_to_zero_without_r2() {
        let bundle = ModelBundle {
            regressor: untrained_regressor(),
            encoders: BTreeMap::new(),
            feature_columns: vec![],
            metrics: BTreeMap::new(),
            model_version: "1.0".to_string(),
            trained_at: 0,
        };
        assert_eq!(bundle.confidence(), 0.0);
    }

    #[test]
    fn test_bundle_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("price_model.json");

        let mut encoders = BTreeMap::new();
        encoders.insert("airline".to_string(), LabelEncoder::fit(&["Indigo", "Vistara"]));
        let mut metrics = BTreeMap::new();
        metrics.insert("r2".to_string(), 0.99);

        let bundle = ModelBundle {
            regressor: untrained_regressor(),
            encoders,
            feature_columns: vec!["airline".to_string(), "duration".to_string()],
            metrics,
            model_version: "1.0".to_string(),
            trained_at: 1_700_000_000,
        };

        bundle.save(&path).unwrap();
        let loaded = ModelBundle::load(&path).unwrap();

        assert_eq!(loaded.feature_columns, bundle.feature_columns);
        assert_eq!(loaded.confidence(), 0.99);
        assert_eq!(loaded.encoders["airline"].code("Vistara"), Some(1));
        assert_eq!(loaded.model_version, "1.0");
    }
}
