//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (selected network profile exists)
//! - Validate value ranges and address formats
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the config
//! - Runs before the config is accepted into the system

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("selected network '{0}' has no profile in [networks]")]
    UnknownNetwork(String),

    #[error("network '{name}': {field} must not be empty")]
    EmptyField { name: String, field: &'static str },

    #[error("launchpad contract address '{0}' is not a valid address")]
    BadLaunchpadAddress(String),

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("default slippage {0}% is out of range (0, 100)")]
    BadSlippage(f64),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.selected_network().is_none() {
        errors.push(ValidationError::UnknownNetwork(config.network.clone()));
    }

    for (name, network) in &config.networks {
        if network.rpc_url.is_empty() {
            errors.push(ValidationError::EmptyField { name: name.clone(), field: "rpc_url" });
        }
        if network.explorer_url.is_empty() {
            errors.push(ValidationError::EmptyField { name: name.clone(), field: "explorer_url" });
        }
    }

    if config.launchpad.contract_address.parse::<Address>().is_err() {
        errors.push(ValidationError::BadLaunchpadAddress(config.launchpad.contract_address.clone()));
    }

    if config.pipeline.receipt_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "pipeline.receipt_timeout_secs" });
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "listener.request_timeout_secs" });
    }

    let slippage = config.pipeline.default_slippage_percent;
    if !(slippage > 0.0 && slippage < 100.0) {
        errors.push(ValidationError::BadSlippage(slippage));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
