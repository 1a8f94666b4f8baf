// User-friendly error messages
//
// Startup and training failures are fatal; these helpers turn them into
// messages that tell the operator what to run next.

use anyhow::{Context, Result};
use std::fmt;

/// Wrap an error with user-friendly context
pub trait UserFriendlyError {
    /// Add user-friendly context with a suggestion
    fn user_context_with_suggestion(self, problem: &str, suggestion: &str) -> Self;
}

impl<T> UserFriendlyError for Result<T> {
    fn user_context_with_suggestion(self, problem: &str, suggestion: &str) -> Self {
        self.with_context(|| wrap_error_with_suggestion(problem, suggestion))
    }
}

/// Format a missing model file error
pub fn model_not_found_error(path: &str) -> String {
    format!(
        "Model file not found: {}\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • The trainer has not been run yet\n\
        • The service was started from a different directory\n\
        • model_path in the config points elsewhere\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Train and save a model:\n\
           \x1b[36msmartcity-ai train\x1b[0m\n\n\
        2. Check the configured path:\n\
           \x1b[36mcat smartcity.toml\x1b[0m",
        path
    )
}

/// Format a model loading error (corrupt or incompatible file)
pub fn model_loading_error(path: &str, error: &str) -> String {
    format!(
        "Failed to load model from {}\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • The file is truncated or was edited by hand\n\
        • The file was written by an incompatible version\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        Retrain the model to overwrite it:\n\
           \x1b[36msmartcity-ai train\x1b[0m",
        path, error
    )
}

/// Format a missing dataset error
pub fn dataset_not_found_error(path: &str) -> String {
    format!(
        "Training dataset not found: {}\n\n\
        \x1b[1;33mExpected:\x1b[0m a CSV file with a header row containing `text` and `label`\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check if the file exists:\n\
           \x1b[36mls -la {}\x1b[0m\n\n\
        2. Point dataset_path in smartcity.toml at your dataset",
        path, path
    )
}

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(path: &str, error: &str) -> String {
    format!(
        "Failed to parse config file {}\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32mCommon mistakes:\x1b[0m\n\
        • Missing quotes around strings\n\
        • Numbers given as strings (test_size = \"0.2\")\n\
        • Settings placed outside their [server] or [training] table",
        path, error
    )
}

/// Wrap a generic error with a suggestion
pub fn wrap_error_with_suggestion(error: impl fmt::Display, suggestion: &str) -> String {
    format!("{}\n\n\x1b[1;33mSuggestion:\x1b[0m {}", error, suggestion)
}
