// TF-IDF vectorizer
//
// Term weights are raw counts scaled by a smoothed inverse document
// frequency, idf(t) = ln((1 + n) / (1 + df(t))) + 1, and each row is
// L2-normalized. Terms unseen during fitting are ignored at transform time.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::tokenizer::tokenize;

/// Sparse feature row: (feature index, weight), sorted by index
pub type SparseVector = Vec<(usize, f64)>;

/// Fitted vocabulary plus per-term inverse document frequencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term → feature index (indices follow sorted term order)
    vocabulary: BTreeMap<String, usize>,
    /// IDF weight per feature index
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and IDF weights from a corpus
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self> {
        if documents.is_empty() {
            bail!("Cannot fit TF-IDF vectorizer on an empty corpus");
        }

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: HashSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            bail!("Empty vocabulary; perhaps the documents only contain stop words");
        }

        let n_docs = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (index, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        tracing::debug!(vocabulary_size = idf.len(), documents = documents.len(), "Fitted TF-IDF vocabulary");

        Ok(Self { vocabulary, idf })
    }

    /// Convert a document into an L2-normalized TF-IDF row
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in tokenize(document) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseVector = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }

        row
    }

    /// Number of features (distinct terms)
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Feature index of a term, if it is in the vocabulary
    pub fn feature_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Check that vocabulary indices and IDF weights agree
    pub(crate) fn validate(&self) -> Result<()> {
        if self.vocabulary.len() != self.idf.len() {
            bail!(
                "Vocabulary has {} terms but {} IDF weights",
                self.vocabulary.len(),
                self.idf.len()
            );
        }
        if self.vocabulary.values().any(|&index| index >= self.idf.len()) {
            bail!("Vocabulary index out of range");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "water leakage near my house",
            "streetlight not working",
            "water pipe burst",
        ]
    }

    #[test]
    fn test_vocabulary_sorted_and_stop_words_removed() {
        let vectorizer = TfidfVectorizer::fit(&corpus()).unwrap();
        // burst, house, leakage, near, pipe, streetlight, water, working
        assert_eq!(vectorizer.n_features(), 8);
        assert_eq!(vectorizer.feature_index("burst"), Some(0));
        assert_eq!(vectorizer.feature_index("working"), Some(7));
        assert_eq!(vectorizer.feature_index("not"), None);
        assert_eq!(vectorizer.feature_index("my"), None);
    }

    #[test]
    fn test_smoothed_idf() {
        let vectorizer = TfidfVectorizer::fit(&corpus()).unwrap();
        let water = vectorizer.feature_index("water").unwrap();
        let burst = vectorizer.feature_index("burst").unwrap();
        // water appears in 2 of 3 documents, burst in 1
        assert!((vectorizer.idf()[water] - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((vectorizer.idf()[burst] - (2.0f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let vectorizer = TfidfVectorizer::fit(&corpus()).unwrap();
        let row = vectorizer.transform("water water pipe");
        let norm: f64 = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_unknown_terms_give_empty_row() {
        let vectorizer = TfidfVectorizer::fit(&corpus()).unwrap();
        assert!(vectorizer.transform("garbage dump overflowing").is_empty());
    }

    #[test]
    fn test_stop_word_only_corpus_rejected() {
        let result = TfidfVectorizer::fit(&["the and of", "it is"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_corpus_rejected() {
        let empty: Vec<&str> = vec![];
        assert!(TfidfVectorizer::fit(&empty).is_err());
    }
}
