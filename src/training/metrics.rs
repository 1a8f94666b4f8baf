// Evaluation metrics for the held-out split

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;

use super::dataset::ComplaintRecord;
use crate::models::TextClassifier;

/// Confusion matrix for a `K`-class classifier
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    /// Number of classes
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`)
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }
}

/// Precision/recall for one label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    /// `TP / (TP + FP)`, zero when the label was never predicted
    pub precision: f64,
    /// `TP / (TP + FN)`, zero when the label has no support
    pub recall: f64,
    /// Number of held-out rows with this label
    pub support: u32,
}

/// Held-out evaluation summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Fraction of held-out rows classified correctly
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
}

/// Evaluate a fitted classifier on labeled rows
pub fn evaluate(classifier: &TextClassifier, records: &[ComplaintRecord]) -> Result<EvaluationReport> {
    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    let labels: Vec<&str> = records.iter().map(|r| r.label.as_str()).collect();
    let accuracy = classifier.score(&texts, &labels)?;

    // Labels absent from training can still show up in the held-out rows
    let all_labels: Vec<String> = classifier
        .classes()
        .iter()
        .cloned()
        .chain(labels.iter().map(|l| l.to_string()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let index_of = |label: &str| all_labels.iter().position(|l| l == label);

    let mut matrix = ConfusionMatrix::new(all_labels.len());
    for (text, label) in texts.iter().zip(&labels) {
        let predicted = classifier.predict(text);
        if let (Some(truth), Some(pred)) = (index_of(*label), index_of(predicted.as_str())) {
            matrix.add(truth, pred);
        }
    }

    Ok(EvaluationReport {
        accuracy,
        per_class: precision_recall_by_class(&matrix, &all_labels),
    })
}

/// Per-class precision and recall from a confusion matrix
pub fn precision_recall_by_class(matrix: &ConfusionMatrix, labels: &[String]) -> Vec<ClassMetrics> {
    let k = matrix.n_classes;
    (0..k)
        .map(|c| {
            let tp = matrix.get(c, c) as f64;
            let support: u32 = (0..k).map(|j| matrix.get(c, j)).sum();
            let predicted: u32 = (0..k).map(|i| matrix.get(i, c)).sum();
            ClassMetrics {
                label: labels.get(c).cloned().unwrap_or_default(),
                precision: if predicted == 0 { 0.0 } else { tp / predicted as f64 },
                recall: if support == 0 { 0.0 } else { tp / support as f64 },
                support,
            }
        })
        .collect()
}
