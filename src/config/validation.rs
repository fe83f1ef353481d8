//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that the receiver wallet is a real Solana address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LaunchpadConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use solana_sdk::pubkey::Pubkey;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::blockchain::transaction::to_minor_units;
use crate::config::schema::LaunchpadConfig;

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Routes the HTTP server registers besides the success view.
pub const RESERVED_PATHS: [&str; 2] = ["/api/wallet", "/health"];

pub fn validate_config(config: &LaunchpadConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(wallet) = config.receiver.wallet() {
        if Pubkey::from_str(wallet).is_err() {
            errors.push(ValidationError::new(
                "receiver.wallet",
                format!("'{}' is not a valid Solana address", wallet),
            ));
        }
    }

    check_http_url(&mut errors, "networks.devnet_rpc_url", &config.networks.devnet_rpc_url);
    check_http_url(&mut errors, "networks.mainnet_rpc_url", &config.networks.mainnet_rpc_url);
    if config.networks.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("networks.rpc_timeout_secs", "must be greater than 0"));
    }

    let amount = config.payment.default_amount.trim();
    if !amount.is_empty() {
        if let Err(e) = to_minor_units(amount, config.payment.default_network.units_per_major()) {
            errors.push(ValidationError::new("payment.default_amount", e.to_string()));
        }
    }
    if config.payment.confirmation_poll_ms == 0 {
        errors.push(ValidationError::new("payment.confirmation_poll_ms", "must be greater than 0"));
    }
    let success_path = config.payment.success_path.as_str();
    if !success_path.starts_with('/') {
        errors.push(ValidationError::new("payment.success_path", "must start with '/'"));
    } else if RESERVED_PATHS.contains(&success_path) {
        errors.push(ValidationError::new(
            "payment.success_path",
            format!("'{}' is already served by another route", success_path),
        ));
    }
    check_http_url(&mut errors, "payment.receiver_url", &config.payment.receiver_url);

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}': {}", value, e))),
    }
}
