// Configuration loader
// Loads settings from an explicit TOML file, ./smartcity.toml, or built-in defaults

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use super::settings::Config;
use crate::errors::config_parse_error;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "smartcity.toml";

/// Load configuration
///
/// An explicit path must exist. Without one, `smartcity.toml` in the current
/// directory is used if present; otherwise every setting takes its default.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            load_from_file(path)?
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                load_from_file(default_path)?
            } else {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        }
    };

    validate(&config)?;
    Ok(config)
}

fn load_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!(config_parse_error(&path.display().to_string(), &e.to_string())))?;

    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let test_size = config.training.test_size;
    if !(test_size > 0.0 && test_size < 1.0) {
        bail!("training.test_size must be between 0 and 1 (exclusive), got {}", test_size);
    }
    if let Some(min_accuracy) = config.training.min_accuracy {
        if !(0.0..=1.0).contains(&min_accuracy) {
            bail!("training.min_accuracy must be between 0 and 1, got {}", min_accuracy);
        }
    }
    Ok(())
}
