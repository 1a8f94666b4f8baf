// Labeled complaint dataset
// CSV loading and the reproducible train/test split

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::dataset_not_found_error;

/// One labeled training example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    /// Complaint text
    pub text: String,
    /// Category name
    pub label: String,
}

impl ComplaintRecord {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Load every row of a CSV file with `text` and `label` columns
///
/// Other columns are ignored. Any malformed row fails the whole load.
pub fn load_dataset(path: &Path) -> Result<Vec<ComplaintRecord>> {
    if !path.exists() {
        bail!(dataset_not_found_error(&path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open dataset {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .clone();
    for column in ["text", "label"] {
        if !headers.iter().any(|h| h == column) {
            bail!(
                "Dataset {} is missing the `{}` column (found: {})",
                path.display(),
                column,
                headers.iter().collect::<Vec<_>>().join(", ")
            );
        }
    }

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<ComplaintRecord>().enumerate() {
        // Line 1 is the header
        let record = row.with_context(|| format!("Malformed row at line {} of {}", i + 2, path.display()))?;
        records.push(record);
    }

    tracing::info!(path = %path.display(), rows = records.len(), "Dataset loaded");
    Ok(records)
}

/// Count rows per label, sorted by label
pub fn label_counts(records: &[ComplaintRecord]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.label.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Shuffle with a fixed seed and split off `ceil(test_size * n)` rows for evaluation
///
/// Returns `(train, test)`. The same records, ratio and seed always give the
/// same partition.
pub fn train_test_split(
    records: &[ComplaintRecord],
    test_size: f64,
    seed: u64,
) -> Result<(Vec<ComplaintRecord>, Vec<ComplaintRecord>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        bail!("test_size must be between 0 and 1 (exclusive), got {}", test_size);
    }

    let n = records.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        bail!(
            "Dataset of {} rows is too small for a {:.0}% evaluation split",
            n,
            test_size * 100.0
        );
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices[..n_test].iter().map(|&i| records[i].clone()).collect();
    let train = indices[n_test..].iter().map(|&i| records[i].clone()).collect();

    Ok((train, test))
}
