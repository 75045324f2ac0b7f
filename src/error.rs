//! Error taxonomy and upstream message normalization.
//!
//! # Responsibilities
//! - Classify every failure into exactly one caller-facing category
//! - Normalize raw chain-node messages into human-readable strings
//! - Never leak raw upstream JSON or stack traces to callers

use thiserror::Error;

/// Caller-facing error categories for pipeline operations.
///
/// Every stage fails fast and attributes its cause to exactly one category.
/// No automatic retries are performed inside the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing credentials, identifiers, or malformed configuration.
    /// Not retryable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed or insufficient input (bad amount, balance below requested).
    /// Not retryable.
    #[error("{0}")]
    Validation(String),

    /// An external service (custody signer, aggregator, chain node transport)
    /// responded with a non-success status. Retryable at caller discretion.
    #[error("{service} error{}: {detail}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Upstream {
        /// Which upstream failed.
        service: &'static str,
        /// HTTP status, when the failure carried one.
        status: Option<u16>,
        /// Response body or transport error, already trimmed.
        detail: String,
    },

    /// The chain node rejected the transaction (revert, underpriced,
    /// nonce too low, insufficient funds). Carries a normalized message.
    #[error("{0}")]
    ChainRejection(String),

    /// Broadcast succeeded but confirmation timed out or the status is
    /// unclear. The transaction may still mine later.
    #[error("transaction status indeterminate: {0}")]
    Indeterminate(String),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Shorthand for an upstream failure with an HTTP status.
    pub fn upstream(service: &'static str, status: u16, detail: impl Into<String>) -> Self {
        Self::Upstream { service, status: Some(status), detail: detail.into() }
    }

    /// Shorthand for an upstream transport failure without a status.
    pub fn transport(service: &'static str, detail: impl Into<String>) -> Self {
        Self::Upstream { service, status: None, detail: detail.into() }
    }

    /// Stable category tag for logging and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Validation(_) => "validation",
            Self::Upstream { .. } => "upstream",
            Self::ChainRejection(_) => "chain_rejection",
            Self::Indeterminate(_) => "indeterminate",
        }
    }
}

/// Known node-error substrings and their human-readable replacements.
const NODE_MESSAGE_TABLE: &[(&str, &str)] = &[
    (
        "execution reverted",
        "Transaction failed - token may have trading restrictions or insufficient liquidity.",
    ),
    (
        "gas required exceeds allowance",
        "Gas estimation failed - token may have complex transfer logic or restrictions.",
    ),
    (
        "insufficient funds",
        "Insufficient funds for gas fee. Please ensure you have enough of the native token for the network fee.",
    ),
    (
        "transaction underpriced",
        "Transaction underpriced. Network is busy - please try again later.",
    ),
    (
        "-32000",
        "Transaction underpriced. Network is busy - please try again later.",
    ),
    (
        "nonce too low",
        "Transaction nonce issue. Please try again in a few moments.",
    ),
];

/// Whether a raw message matches a known node-level transaction rejection.
pub fn is_node_rejection(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    NODE_MESSAGE_TABLE.iter().any(|(needle, _)| lowered.contains(needle))
}

/// Map a raw chain-node error message onto a normalized human string.
///
/// Unknown messages pass through with a generic prefix so raw JSON-RPC
/// payloads never reach callers verbatim.
pub fn normalize_node_message(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    for (needle, replacement) in NODE_MESSAGE_TABLE {
        if lowered.contains(needle) {
            return (*replacement).to_string();
        }
    }
    format!("Chain node rejected the request: {}", raw.trim())
}
