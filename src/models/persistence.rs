// Model persistence utilities
// Saves and loads the fitted classifier together with its training metadata

use anyhow::{bail, Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::Path;

use super::classifier::TextClassifier;
use crate::errors::{model_loading_error, model_not_found_error};

/// Version of the on-disk model format
pub const FORMAT_VERSION: u32 = 1;

/// Model type identifier written into every artifact
pub const MODEL_TYPE: &str = "tfidf-multinomial-nb";

/// Metadata saved alongside the fitted pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model type identifier
    pub model_type: String,
    /// Version of the persistence format
    pub format_version: u32,
    /// Timestamp of training (RFC 3339)
    pub trained_at: String,
    /// Rows used for fitting
    pub train_size: usize,
    /// Rows held out for evaluation
    pub test_size: usize,
    /// Held-out accuracy in [0, 1]
    pub accuracy: f64,
}

impl ModelMetadata {
    pub fn new(train_size: usize, test_size: usize, accuracy: f64) -> Self {
        Self {
            model_type: MODEL_TYPE.to_string(),
            format_version: FORMAT_VERSION,
            trained_at: chrono::Utc::now().to_rfc3339(),
            train_size,
            test_size,
            accuracy,
        }
    }
}

/// Everything the trainer hands to the prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub classifier: TextClassifier,
}

/// Save a model artifact, replacing any existing file
///
/// Writes under an exclusive lock file to a temporary path and renames it
/// into place, so readers never observe a partial model.
pub fn save_model(path: &Path, artifact: &ModelArtifact) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create model directory {}", parent.display()))?;
        }
    }

    let lock_path = path.with_extension("lock");
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;
    lock_file
        .lock_exclusive()
        .with_context(|| format!("Failed to lock {}", lock_path.display()))?;

    let written = write_atomically(path, artifact);

    // Only concurrent writers contend for the lock; it is not left behind
    let _ = fs2::FileExt::unlock(&lock_file);
    drop(lock_file);
    let _ = fs::remove_file(&lock_path);
    written?;

    tracing::info!(
        path = %path.display(),
        model_type = %artifact.metadata.model_type,
        accuracy = artifact.metadata.accuracy,
        "Saved model"
    );

    Ok(())
}

/// Write to a temporary sibling and rename it over `path`
fn write_atomically(path: &Path, artifact: &ModelArtifact) -> Result<()> {
    let json = serde_json::to_string(artifact).context("Failed to serialize model")?;
    let temp_path = path.with_extension("tmp");
    let result = fs::write(&temp_path, json)
        .with_context(|| format!("Failed to write model to {}", temp_path.display()))
        .and_then(|_| {
            fs::rename(&temp_path, path)
                .with_context(|| format!("Failed to move model into place at {}", path.display()))
        });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Load and validate a model artifact
pub fn load_model(path: &Path) -> Result<ModelArtifact> {
    if !path.exists() {
        bail!(model_not_found_error(&path.display().to_string()));
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read model from {}", path.display()))?;

    let artifact: ModelArtifact = serde_json::from_str(&json)
        .map_err(|e| anyhow::anyhow!(model_loading_error(&path.display().to_string(), &e.to_string())))?;

    if artifact.metadata.format_version != FORMAT_VERSION {
        bail!(model_loading_error(
            &path.display().to_string(),
            &format!(
                "unsupported format version {} (expected {})",
                artifact.metadata.format_version, FORMAT_VERSION
            ),
        ));
    }

    artifact
        .classifier
        .validate()
        .map_err(|e| anyhow::anyhow!(model_loading_error(&path.display().to_string(), &e.to_string())))?;

    tracing::info!(
        path = %path.display(),
        classes = artifact.classifier.classes().len(),
        features = artifact.classifier.n_features(),
        trained_at = %artifact.metadata.trained_at,
        "Loaded model"
    );

    Ok(artifact)
}
