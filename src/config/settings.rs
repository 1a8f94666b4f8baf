// Configuration structs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration shared by the trainer and the prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Serialized model, written by the trainer and read by the server
    /// (default: model.json)
    pub model_path: PathBuf,

    /// Labeled CSV dataset with `text` and `label` columns
    /// (default: complaints_dataset.csv)
    pub dataset_path: PathBuf,

    /// Trainer settings
    pub training: TrainingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model_path: PathBuf::from("model.json"),
            dataset_path: PathBuf::from("complaints_dataset.csv"),
            training: TrainingConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: 127.0.0.1:5001)
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5001".to_string(),
        }
    }
}

/// Trainer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation (default: 0.2)
    pub test_size: f64,

    /// Seed for the train/test shuffle (default: 42)
    pub seed: u64,

    /// Refuse to save a model whose held-out accuracy is below this.
    /// Unset by default: the model is always saved.
    pub min_accuracy: Option<f64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
            min_accuracy: None,
        }
    }
}
