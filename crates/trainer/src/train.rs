//! GBDT regressor fitting and evaluation

use crate::dataset::Split;
use crate::eval::{mean_absolute_error, r2_score, root_mean_squared_error};
use anyhow::{bail, Result};
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use std::collections::BTreeMap;
use tracing::info;

/// Regressor hyperparameters
#[derive(Debug, Clone)]
pub struct TrainParams {
    pub iterations: usize,
    pub max_depth: u32,
    pub shrinkage: f32,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            iterations: 100,
            max_depth: 6,
            shrinkage: 0.1,
        }
    }
}

/// Fit a squared-error GBDT regressor on the training rows
pub fn fit_regressor(rows: &[Vec<f32>], targets: &[f32], params: &TrainParams) -> Result<GBDT> {
    if rows.is_empty() {
        bail!("no training rows");
    }
    let feature_size = rows[0].len();

    let mut config = Config::new();
    config.set_feature_size(feature_size);
    config.set_max_depth(params.max_depth);
    config.set_iterations(params.iterations);
    config.set_shrinkage(params.shrinkage);
    config.set_loss("SquaredError");

    let mut training: DataVec = rows
        .iter()
        .zip(targets)
        .map(|(row, &target)| Data::new_training_data(row.clone(), 1.0, target, None))
        .collect();

    info!(
        samples = training.len(),
        features = feature_size,
        iterations = params.iterations,
        max_depth = params.max_depth,
        "Training GBDT regressor"
    );

    let mut regressor = GBDT::new(&config);
    regressor.fit(&mut training);
    Ok(regressor)
}

/// Evaluate a fitted regressor on held-out rows
pub fn evaluate(regressor: &GBDT, split: &Split) -> BTreeMap<String, f64> {
    let test: DataVec = split
        .test_rows
        .iter()
        .map(|row| Data::new_test_data(row.clone(), None))
        .collect();
    let predicted = regressor.predict(&test);

    let mae = mean_absolute_error(&split.test_targets, &predicted);
    let rmse = root_mean_squared_error(&split.test_targets, &predicted);
    let r2 = r2_score(&split.test_targets, &predicted);

    info!(mae = mae, rmse = rmse, r2 = r2, "Model evaluation");

    let mut metrics = BTreeMap::new();
    metrics.insert("mae".to_string(), mae);
    metrics.insert("rmse".to_string(), rmse);
    metrics.insert("r2".to_string(), r2);
    metrics
}
