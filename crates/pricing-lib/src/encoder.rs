//! Feature encoding for price prediction
//!
//! Turns a raw feature record into the exact numeric vector the regressor
//! was trained on: category strings become integer codes from the bundle's
//! fitted vocabularies, and the output is reindexed into the bundle's
//! feature column order.
//!
//! Encoding never fails a request. Unseen categories and columns the
//! record does not carry are substituted with a default code of zero and
//! logged. That is a deliberately lossy policy: a bad input yields a
//! (possibly poor) prediction instead of an error, and the substitutions
//! are only visible in the warn logs and counters.

use crate::bundle::ModelBundle;
use crate::models::{FeatureRecord, FieldValue};
use std::collections::HashMap;
use tracing::warn;

/// Fallback code substituted for categories outside the fitted vocabulary
pub const UNSEEN_CATEGORY_CODE: usize = 0;

/// Counts of lossy substitutions applied while encoding one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub unseen_categories: u32,
    pub missing_columns: u32,
}

/// Maps feature records to model-ready rows using a loaded bundle
pub struct FeatureEncoder<'a> {
    bundle: &'a ModelBundle,
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(bundle: &'a ModelBundle) -> Self {
        Self { bundle }
    }

    /// Encode one record into a row in `feature_columns` order
    ///
    /// Record fields not named in `feature_columns` are dropped.
    pub fn encode(&self, record: &FeatureRecord) -> (Vec<f32>, EncodeStats) {
        let columns = record.columns();
        let fields: HashMap<&str, FieldValue> = columns.iter().copied().collect();
        let mut stats = EncodeStats::default();

        let row = self
            .bundle
            .feature_columns
            .iter()
            .map(|column| self.encode_column(column, &fields, &mut stats))
            .collect();

        (row, stats)
    }

    fn encode_column(
        &self,
        column: &str,
        fields: &HashMap<&str, FieldValue>,
        stats: &mut EncodeStats,
    ) -> f32 {
        match fields.get(column) {
            Some(FieldValue::Number(n)) => *n,
            Some(FieldValue::Text(value)) => match self.bundle.encoders.get(column) {
                Some(encoder) => match encoder.code(value) {
                    Some(code) => code as f32,
                    None => {
                        warn!(
                            column = %column,
                            value = %value,
                            "Unknown category, using default code"
                        );
                        stats.unseen_categories += 1;
                        UNSEEN_CATEGORY_CODE as f32
                    }
                },
                None => {
                    // A text field feeding a column the bundle expects to be
                    // numeric cannot be encoded; treat it as absent.
                    warn!(column = %column, "No encoder fitted for column, using 0");
                    stats.missing_columns += 1;
                    0.0
                }
            },
            None => {
                warn!(column = %column, "Missing column, using 0");
                stats.missing_columns += 1;
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::LabelEncoder;
    use gbdt::config::Config;
    use gbdt::gradient_boost::GBDT;
    use std::collections::BTreeMap;

    fn test_bundle(feature_columns: &[&str]) -> ModelBundle {
        let mut encoders = BTreeMap::new();
        encoders.insert(
            "airline".to_string(),
            LabelEncoder::fit(&["Air India", "Indigo", "Vistara"]),
        );
        encoders.insert(
            "source_city".to_string(),
            LabelEncoder::fit(&["Chennai", "Delhi", "Mumbai"]),
        );
        encoders.insert(
            "destination_city".to_string(),
            LabelEncoder::fit(&["Chennai", "Delhi", "Mumbai"]),
        );
        encoders.insert(
            "departure_time".to_string(),
            LabelEncoder::fit(&["Evening", "Morning", "Night"]),
        );
        encoders.insert(
            "arrival_time".to_string(),
            LabelEncoder::fit(&["Evening", "Morning", "Night"]),
        );
        encoders.insert(
            "stops".to_string(),
            LabelEncoder::fit(&["one", "two_or_more", "zero"]),
        );
        encoders.insert(
            "class".to_string(),
            LabelEncoder::fit(&["Business", "Economy"]),
        );

        ModelBundle {
            regressor: GBDT::new(&Config::new()),
            encoders,
            feature_columns: feature_columns.iter().map(|c| c.to_string()).collect(),
            metrics: BTreeMap::new(),
            model_version: "1.0".to_string(),
            trained_at: 0,
        }
    }

    fn sample_record() -> FeatureRecord {
        FeatureRecord {
            airline: "Indigo".to_string(),
            source_city: "Delhi".to_string(),
            destination_city: "Mumbai".to_string(),
            departure_time: "Morning".to_string(),
            arrival_time: "Evening".to_string(),
            stops: "zero".to_string(),
            flight_class: "Economy".to_string(),
            duration: 2.5,
            days_left: 15,
        }
    }

    #[test]
    fn test_encode_known_categories_in_column_order() {
        let bundle = test_bundle(&[
            "airline",
            "source_city",
            "departure_time",
            "stops",
            "arrival_time",
            "destination_city",
            "class",
            "duration",
            "days_left",
        ]);
        let encoder = FeatureEncoder::new(&bundle);

        let (row, stats) = encoder.encode(&sample_record());

        // Indigo=1, Delhi=1, Morning=1, zero=2, Evening=0, Mumbai=2, Economy=1
        assert_eq!(row, vec![1.0, 1.0, 1.0, 2.0, 0.0, 2.0, 1.0, 2.5, 15.0]);
        assert_eq!(stats, EncodeStats::default());
    }

    #[test]
    fn test_unseen_category_falls_back_to_default_code() {
        let bundle = test_bundle(&["airline", "duration"]);
        let encoder = FeatureEncoder::new(&bundle);

        let mut record = sample_record();
        record.airline = "SpiceJet".to_string();
        let (row, stats) = encoder.encode(&record);

        assert_eq!(row, vec![UNSEEN_CATEGORY_CODE as f32, 2.5]);
        assert_eq!(stats.unseen_categories, 1);
        assert_eq!(stats.missing_columns, 0);
    }

    #[test]
    fn test_missing_column_filled_with_zero() {
        let bundle = test_bundle(&["airline", "route_popularity", "duration"]);
        let encoder = FeatureEncoder::new(&bundle);

        let (row, stats) = encoder.encode(&sample_record());

        assert_eq!(row, vec![1.0, 0.0, 2.5]);
        assert_eq!(stats.missing_columns, 1);
    }

    #[test]
    fn test_record_fields_outside_feature_columns_are_dropped() {
        let bundle = test_bundle(&["duration", "days_left"]);
        let encoder = FeatureEncoder::new(&bundle);

        let (row, stats) = encoder.encode(&sample_record());

        assert_eq!(row, vec![2.5, 15.0]);
        assert_eq!(stats, EncodeStats::default());
    }

    #[test]
    fn test_flight_class_populates_class_column() {
        let bundle = test_bundle(&["class"]);
        let encoder = FeatureEncoder::new(&bundle);

        let mut record = sample_record();
        record.flight_class = "Business".to_string();
        let (row, _) = encoder.encode(&record);

        assert_eq!(row, vec![0.0]);
    }
}
