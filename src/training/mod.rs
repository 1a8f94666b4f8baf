// Training module - Dataset loading, evaluation and the offline trainer

pub mod dataset;
pub mod metrics;
pub mod trainer;

pub use dataset::{load_dataset, train_test_split, ComplaintRecord};
pub use metrics::{evaluate, ClassMetrics, EvaluationReport};
pub use trainer::{Trainer, TrainingReport};
