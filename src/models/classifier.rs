// Text classification pipeline
// TF-IDF feature extraction followed by multinomial Naive Bayes, fitted as one unit

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::naive_bayes::{argmax, MultinomialNaiveBayes, DEFAULT_ALPHA};
use super::tfidf::{SparseVector, TfidfVectorizer};

/// Result of classifying one piece of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Most probable label
    pub category: String,
    /// Probability of `category` as a percentage, rounded to two decimals
    pub confidence: f64,
}

/// Convert a probability in [0, 1] to a percentage with two decimals
///
/// Exact halves round to even, so 0.87125 gives 87.12.
pub fn confidence_percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round_ties_even() / 100.0
}

/// Fitted complaint classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextClassifier {
    vectorizer: TfidfVectorizer,
    model: MultinomialNaiveBayes,
}

impl TextClassifier {
    /// Fit the full pipeline on texts and their labels
    pub fn fit<T: AsRef<str>, L: AsRef<str>>(texts: &[T], labels: &[L]) -> Result<Self> {
        if texts.len() != labels.len() {
            bail!(
                "Mismatched training data: {} texts, {} labels",
                texts.len(),
                labels.len()
            );
        }

        let vectorizer = TfidfVectorizer::fit(texts)?;
        let rows: Vec<SparseVector> = texts
            .iter()
            .map(|text| vectorizer.transform(text.as_ref()))
            .collect();
        let model =
            MultinomialNaiveBayes::fit(&rows, labels, vectorizer.n_features(), DEFAULT_ALPHA)?;

        tracing::info!(
            samples = texts.len(),
            features = vectorizer.n_features(),
            classes = model.classes().len(),
            "Fitted text classifier"
        );

        Ok(Self { vectorizer, model })
    }

    /// Labels the classifier can emit, sorted
    pub fn classes(&self) -> &[String] {
        self.model.classes()
    }

    pub fn n_features(&self) -> usize {
        self.vectorizer.n_features()
    }

    /// Probability distribution over all known labels
    pub fn predict_proba(&self, text: &str) -> Vec<(String, f64)> {
        let row = self.vectorizer.transform(text);
        self.classes()
            .iter()
            .cloned()
            .zip(self.model.predict_proba(&row))
            .collect()
    }

    /// Most probable label
    pub fn predict(&self, text: &str) -> String {
        let row = self.vectorizer.transform(text);
        let jll = self.model.joint_log_likelihood(&row);
        let best = argmax(&jll).unwrap_or(0);
        self.classes()[best].clone()
    }

    /// Predicted label plus confidence percentage
    pub fn classify(&self, text: &str) -> Result<Prediction> {
        let row = self.vectorizer.transform(text);
        let proba = self.model.predict_proba(&row);

        if proba.iter().any(|p| !p.is_finite()) {
            bail!("Model produced non-finite probabilities");
        }

        let best = match argmax(&proba) {
            Some(index) => index,
            None => bail!("Model has no classes"),
        };

        Ok(Prediction {
            category: self.classes()[best].clone(),
            confidence: confidence_percent(proba[best]),
        })
    }

    /// Fraction of texts whose predicted label matches the expected one
    pub fn score<T: AsRef<str>, L: AsRef<str>>(&self, texts: &[T], labels: &[L]) -> Result<f64> {
        if texts.is_empty() {
            bail!("Cannot score on an empty evaluation set");
        }
        if texts.len() != labels.len() {
            bail!(
                "Mismatched evaluation data: {} texts, {} labels",
                texts.len(),
                labels.len()
            );
        }

        let correct = texts
            .iter()
            .zip(labels)
            .filter(|(text, label)| self.predict(text.as_ref()) == label.as_ref())
            .count();

        Ok(correct as f64 / texts.len() as f64)
    }

    /// Check that a deserialized classifier is internally consistent
    pub fn validate(&self) -> Result<()> {
        self.vectorizer.validate()?;
        self.model.validate(self.vectorizer.n_features())
    }
}
