//! Dataset ingestion and preparation
//!
//! Loads the tabular flight price CSV, cleans it (index and identifier
//! columns dropped, incomplete rows removed), splits columns into numeric
//! and categorical, fits label encoders, and produces the numeric feature
//! matrix the regressor trains on.

use anyhow::{bail, Context, Result};
use pricing_lib::LabelEncoder;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Columns excluded from the feature set regardless of content
const DROPPED_COLUMNS: &[&str] = &["Unnamed: 0", "flight"];

/// Raw CSV contents: headers plus string cells, complete rows only
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Prepared training data: encoded features in fixed column order
pub struct Dataset {
    pub feature_columns: Vec<String>,
    pub encoders: BTreeMap<String, LabelEncoder>,
    pub rows: Vec<Vec<f32>>,
    pub targets: Vec<f32>,
}

/// An index-based train/test partition of a dataset
pub struct Split {
    pub train_rows: Vec<Vec<f32>>,
    pub train_targets: Vec<f32>,
    pub test_rows: Vec<Vec<f32>>,
    pub test_targets: Vec<f32>,
}

/// Load a CSV file with headers, dropping rows with empty cells
pub fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("dataset has no header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    let mut incomplete = 0usize;
    for record in reader.records() {
        let record = record.context("failed to read dataset row")?;
        let cells: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        if cells.len() != headers.len() || cells.iter().any(|c| c.is_empty()) {
            incomplete += 1;
            continue;
        }
        rows.push(cells);
    }

    if incomplete > 0 {
        warn!(dropped = incomplete, "Dropped rows with missing values");
    }
    info!(
        rows = rows.len(),
        columns = headers.len(),
        "Dataset loaded"
    );

    Ok(RawTable { headers, rows })
}

impl RawTable {
    /// Locate the target column: first header containing "price"
    pub fn target_column(&self) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.to_lowercase().contains("price"))
            .with_context(|| format!("cannot find price column in {:?}", self.headers))
    }
}

/// Encode a raw table into a numeric dataset
///
/// Columns whose every value parses as a number stay numeric; the rest are
/// label-encoded with a vocabulary fitted from this table. Index and
/// identifier columns are dropped up front.
pub fn prepare(table: &RawTable) -> Result<Dataset> {
    if table.rows.is_empty() {
        bail!("dataset has no usable rows");
    }

    let target_idx = table.target_column()?;
    let feature_indices: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != target_idx && !DROPPED_COLUMNS.contains(&h.as_str()))
        .map(|(i, _)| i)
        .collect();

    let mut feature_columns = Vec::with_capacity(feature_indices.len());
    let mut encoders = BTreeMap::new();
    let mut column_values: Vec<Vec<f32>> = Vec::with_capacity(feature_indices.len());

    for &idx in &feature_indices {
        let name = table.headers[idx].clone();
        let raw: Vec<&str> = table.rows.iter().map(|row| row[idx].as_str()).collect();

        let numeric: Option<Vec<f32>> = raw.iter().map(|v| v.parse::<f32>().ok()).collect();
        let values = match numeric {
            Some(values) => values,
            None => {
                let encoder = LabelEncoder::fit(&raw);
                info!(
                    column = %name,
                    categories = encoder.len(),
                    "Encoded categorical column"
                );
                let values = raw
                    .iter()
                    .map(|v| encoder.code(v).unwrap_or(0) as f32)
                    .collect();
                encoders.insert(name.clone(), encoder);
                values
            }
        };

        feature_columns.push(name);
        column_values.push(values);
    }

    let targets: Vec<f32> = table
        .rows
        .iter()
        .map(|row| {
            row[target_idx]
                .parse::<f32>()
                .with_context(|| format!("non-numeric price value {:?}", row[target_idx]))
        })
        .collect::<Result<_>>()?;

    let rows: Vec<Vec<f32>> = (0..table.rows.len())
        .map(|r| column_values.iter().map(|col| col[r]).collect())
        .collect();

    Ok(Dataset {
        feature_columns,
        encoders,
        rows,
        targets,
    })
}

/// Shuffled train/test split; a fixed seed makes the split reproducible
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: Option<u64>) -> Result<Split> {
    if !(0.0..1.0).contains(&test_size) {
        bail!("test size must be in [0, 1), got {}", test_size);
    }

    let mut indices: Vec<usize> = (0..dataset.rows.len()).collect();
    match seed {
        Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => indices.shuffle(&mut thread_rng()),
    }

    let test_count = (dataset.rows.len() as f64 * test_size).round() as usize;
    let (test_indices, train_indices) = indices.split_at(test_count);

    if train_indices.is_empty() {
        bail!("train split is empty; not enough rows for test size {}", test_size);
    }

    let collect_rows = |idx: &[usize]| -> (Vec<Vec<f32>>, Vec<f32>) {
        idx.iter()
            .map(|&i| (dataset.rows[i].clone(), dataset.targets[i]))
            .unzip()
    };

    let (train_rows, train_targets) = collect_rows(train_indices);
    let (test_rows, test_targets) = collect_rows(test_indices);

    Ok(Split {
        train_rows,
        train_targets,
        test_rows,
        test_targets,
    })
}
