// Text classification models
// TF-IDF vectorizer + multinomial Naive Bayes, fitted and persisted as one pipeline

pub mod classifier;
pub mod naive_bayes;
pub mod persistence;
pub mod tfidf;
pub mod tokenizer;

pub use classifier::{confidence_percent, Prediction, TextClassifier};
pub use naive_bayes::MultinomialNaiveBayes;
pub use persistence::{
    load_model, save_model, ModelArtifact, ModelMetadata, FORMAT_VERSION,
};
pub use tfidf::{SparseVector, TfidfVectorizer};
pub use tokenizer::tokenize;
