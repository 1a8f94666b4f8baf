// Multinomial Naive Bayes over sparse TF-IDF rows
//
// Feature likelihoods use additive (Laplace) smoothing and class priors are
// fitted from label frequencies. Classes are kept in sorted label order.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::tfidf::SparseVector;

/// Default additive smoothing parameter
pub const DEFAULT_ALPHA: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    /// Known labels, sorted
    classes: Vec<String>,
    /// ln P(class)
    class_log_prior: Vec<f64>,
    /// ln P(feature | class), one row per class
    feature_log_prob: Vec<Vec<f64>>,
    /// Smoothing used when fitting
    alpha: f64,
}

impl MultinomialNaiveBayes {
    /// Fit on feature rows and their labels
    pub fn fit<S: AsRef<str>>(
        samples: &[SparseVector],
        labels: &[S],
        n_features: usize,
        alpha: f64,
    ) -> Result<Self> {
        if samples.is_empty() {
            bail!("Cannot fit classifier on zero samples");
        }
        if samples.len() != labels.len() {
            bail!(
                "Mismatched training inputs: {} samples, {} labels",
                samples.len(),
                labels.len()
            );
        }
        if n_features == 0 {
            bail!("Cannot fit classifier with zero features");
        }
        if alpha <= 0.0 || !alpha.is_finite() {
            bail!("Smoothing alpha must be a positive number, got {}", alpha);
        }

        let classes: Vec<String> = labels
            .iter()
            .map(|label| label.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let class_index: BTreeMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect();

        let mut class_count = vec![0.0f64; classes.len()];
        let mut feature_count = vec![vec![0.0f64; n_features]; classes.len()];
        for (row, label) in samples.iter().zip(labels) {
            let c = class_index[label.as_ref()];
            class_count[c] += 1.0;
            for &(feature, weight) in row {
                if feature >= n_features {
                    bail!("Feature index {} out of range ({} features)", feature, n_features);
                }
                feature_count[c][feature] += weight;
            }
        }

        let total = class_count.iter().sum::<f64>();
        let class_log_prior = class_count.iter().map(|n| (n / total).ln()).collect();

        let feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let denom = (counts.iter().sum::<f64>() + alpha * n_features as f64).ln();
                counts.into_iter().map(|fc| (fc + alpha).ln() - denom).collect()
            })
            .collect();

        Ok(Self {
            classes,
            class_log_prior,
            feature_log_prob,
            alpha,
        })
    }

    /// Unnormalized log posterior per class
    pub fn joint_log_likelihood(&self, row: &SparseVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + row
                        .iter()
                        .map(|&(feature, weight)| weight * log_probs[feature])
                        .sum::<f64>()
            })
            .collect()
    }

    /// Posterior probability per class, in `classes()` order
    pub fn predict_proba(&self, row: &SparseVector) -> Vec<f64> {
        let jll = self.joint_log_likelihood(row);
        let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let log_norm = max + jll.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
        jll.into_iter().map(|v| (v - log_norm).exp()).collect()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check internal dimensions against the expected feature count
    pub(crate) fn validate(&self, n_features: usize) -> Result<()> {
        if self.classes.is_empty() {
            bail!("Classifier has no classes");
        }
        if self.class_log_prior.len() != self.classes.len()
            || self.feature_log_prob.len() != self.classes.len()
        {
            bail!("Classifier parameter shapes do not match its {} classes", self.classes.len());
        }
        if self.feature_log_prob.iter().any(|row| row.len() != n_features) {
            bail!("Classifier expects a different number of features than the vectorizer provides");
        }
        Ok(())
    }
}

/// Index of the first maximum value
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, current)) if v <= current => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
