// Smart City AI - Complaint category classifier
// Library exports

pub mod config;
pub mod errors;
pub mod models; // TF-IDF + Naive Bayes pipeline and persistence
pub mod server; // HTTP prediction service
pub mod training; // Offline trainer
