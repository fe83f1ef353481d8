//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::LaunchpadConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `[receiver] wallet`.
pub const RECEIVER_WALLET_ENV_VAR: &str = "RECEIVER_WALLET";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LaunchpadConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    load_config_str(&content)
}

/// Load from a file when given, otherwise start from defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<LaunchpadConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => finalize(LaunchpadConfig::default(), |key| std::env::var(key).ok()),
    }
}

/// Parse, apply environment overrides and validate.
pub fn load_config_str(content: &str) -> Result<LaunchpadConfig, ConfigError> {
    let config: LaunchpadConfig = toml::from_str(content)?;
    finalize(config, |key| std::env::var(key).ok())
}

fn finalize(
    mut config: LaunchpadConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<LaunchpadConfig, ConfigError> {
    apply_env_overrides(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides through `env`.
pub fn apply_env_overrides(config: &mut LaunchpadConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(wallet) = env(RECEIVER_WALLET_ENV_VAR) {
        tracing::debug!("Receiver wallet taken from {}", RECEIVER_WALLET_ENV_VAR);
        config.receiver.wallet = wallet;
    }
}
