//! Price Trainer - offline training pipeline
//!
//! Trains the flight price regression model from a tabular CSV dataset
//! and writes the serialized model bundle the serving process loads.
//!
//! The Kaggle flight price dataset must be downloaded separately and
//! passed via --data; the download needs API credentials, so it is not
//! automated here.

mod dataset;
mod eval;
mod train;

use anyhow::Result;
use clap::Parser;
use pricing_lib::ModelBundle;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Train the flight price prediction model
#[derive(Parser)]
#[command(name = "price-trainer")]
#[command(author, version, about = "Train the flight price prediction model", long_about = None)]
struct Cli {
    /// Path to the training dataset CSV (e.g. Clean_Dataset.csv)
    #[arg(long, env = "PRICE_TRAINING_DATA")]
    data: PathBuf,

    /// Where to write the trained model bundle
    #[arg(long, default_value = "models/price_model.json")]
    output: PathBuf,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    /// Number of boosting iterations
    #[arg(long, default_value_t = 100)]
    iterations: usize,

    /// Maximum tree depth
    #[arg(long, default_value_t = 6)]
    max_depth: u32,

    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    shrinkage: f32,

    /// Fixed seed for a reproducible train/test split
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    info!(data = %cli.data.display(), "Loading dataset");
    let table = dataset::load_csv(&cli.data)?;
    let prepared = dataset::prepare(&table)?;

    info!(
        features = prepared.feature_columns.len(),
        categorical = prepared.encoders.len(),
        "Dataset prepared"
    );

    let split = dataset::train_test_split(&prepared, cli.test_size, cli.seed)?;
    info!(
        train = split.train_rows.len(),
        test = split.test_rows.len(),
        "Dataset split"
    );

    let params = train::TrainParams {
        iterations: cli.iterations,
        max_depth: cli.max_depth,
        shrinkage: cli.shrinkage,
    };
    let regressor = train::fit_regressor(&split.train_rows, &split.train_targets, &params)?;
    let metrics = train::evaluate(&regressor, &split);

    let bundle = ModelBundle {
        regressor,
        encoders: prepared.encoders,
        feature_columns: prepared.feature_columns,
        metrics,
        model_version: "1.0".to_string(),
        trained_at: chrono::Utc::now().timestamp(),
    };
    bundle.save(&cli.output)?;

    info!(output = %cli.output.display(), "Model bundle saved");
    Ok(())
}
