// Offline trainer
// Load dataset → split → fit → evaluate → save

use anyhow::{bail, Result};
use std::path::PathBuf;

use super::dataset::{label_counts, load_dataset, train_test_split, ComplaintRecord};
use super::metrics::{evaluate, EvaluationReport};
use crate::config::Config;
use crate::errors::UserFriendlyError;
use crate::models::{save_model, ModelArtifact, ModelMetadata, TextClassifier};

/// Rows logged before training starts
const PREVIEW_ROWS: usize = 5;

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Rows in the dataset
    pub dataset_size: usize,
    pub train_size: usize,
    pub test_size: usize,
    /// Held-out evaluation
    pub evaluation: EvaluationReport,
    /// Where the model was written
    pub model_path: PathBuf,
}

/// Fits and persists the complaint classifier
pub struct Trainer {
    config: Config,
}

impl Trainer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Train from the configured dataset and save the model
    pub fn run(&self) -> Result<TrainingReport> {
        let records = load_dataset(&self.config.dataset_path)?;
        log_preview(&records);
        self.train_and_save(&records)
    }

    /// Train on in-memory records and save the model
    pub fn train_and_save(&self, records: &[ComplaintRecord]) -> Result<TrainingReport> {
        let (classifier, report) = self.fit_and_evaluate(records)?;

        let accuracy = report.evaluation.accuracy;
        if let Some(min_accuracy) = self.config.training.min_accuracy {
            if accuracy < min_accuracy {
                bail!(
                    "Held-out accuracy {:.2} is below training.min_accuracy {:.2}; \
                     keeping the existing model at {}",
                    accuracy,
                    min_accuracy,
                    self.config.model_path.display()
                );
            }
        }

        let artifact = ModelArtifact {
            metadata: ModelMetadata::new(report.train_size, report.test_size, accuracy),
            classifier,
        };
        save_model(&self.config.model_path, &artifact)?;

        Ok(report)
    }

    /// Split, fit and evaluate without touching the model file
    pub fn fit_and_evaluate(&self, records: &[ComplaintRecord]) -> Result<(TextClassifier, TrainingReport)> {
        let training = &self.config.training;
        let (train, test) = train_test_split(records, training.test_size, training.seed)?;

        let texts: Vec<&str> = train.iter().map(|r| r.text.as_str()).collect();
        let labels: Vec<&str> = train.iter().map(|r| r.label.as_str()).collect();
        let classifier = TextClassifier::fit(&texts, &labels).user_context_with_suggestion(
            "Failed to fit the classifier",
            "make sure the dataset rows contain descriptive text, not only stop words",
        )?;

        let evaluation = evaluate(&classifier, &test)?;

        tracing::info!(
            accuracy = %format!("{:.2}", evaluation.accuracy),
            train_size = train.len(),
            test_size = test.len(),
            "Model trained successfully"
        );
        for class in &evaluation.per_class {
            tracing::info!(
                label = %class.label,
                precision = %format!("{:.2}", class.precision),
                recall = %format!("{:.2}", class.recall),
                support = class.support,
                "Held-out class metrics"
            );
        }

        let report = TrainingReport {
            dataset_size: records.len(),
            train_size: train.len(),
            test_size: test.len(),
            evaluation,
            model_path: self.config.model_path.clone(),
        };

        Ok((classifier, report))
    }
}

fn log_preview(records: &[ComplaintRecord]) {
    for (row, record) in records.iter().take(PREVIEW_ROWS).enumerate() {
        tracing::info!(row, text = %record.text, label = %record.label, "Dataset preview");
    }
    for (label, count) in label_counts(records) {
        tracing::info!(label, count, "Label distribution");
    }
}
