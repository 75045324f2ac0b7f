//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! orchestrator. All types derive Serde traits for deserialization from the
//! TOML config file. Secrets (custody credentials, signing keys) are never
//! part of the file; they come from environment variables only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the orchestrator service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name of the selected network profile.
    pub network: String,

    /// Named network profiles.
    pub networks: BTreeMap<String, NetworkConfig>,

    /// Custody signing service settings.
    pub custody: CustodyConfig,

    /// DEX-aggregator settings.
    pub aggregator: AggregatorConfig,

    /// Bonding-curve launchpad settings.
    pub launchpad: LaunchpadConfig,

    /// Token-search (ticker lookup) settings.
    pub token_lookup: TokenLookupConfig,

    /// HTTP listener settings.
    pub listener: ListenerConfig,

    /// Pipeline tuning (receipt waits, default slippage).
    pub pipeline: PipelineConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert("mainnet".to_string(), NetworkConfig::default());
        Self {
            network: "mainnet".to_string(),
            networks,
            custody: CustodyConfig::default(),
            aggregator: AggregatorConfig::default(),
            launchpad: LaunchpadConfig::default(),
            token_lookup: TokenLookupConfig::default(),
            listener: ListenerConfig::default(),
            pipeline: PipelineConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// The selected network profile, if it exists.
    pub fn selected_network(&self) -> Option<&NetworkConfig> {
        self.networks.get(&self.network)
    }
}

/// A chain network profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: String,

    /// Expected chain id.
    pub chain_id: u64,

    /// Block-explorer base URL.
    pub explorer_url: String,

    /// Native-token ticker symbol.
    pub native_symbol: String,

    /// Per-call RPC timeout.
    pub rpc_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.soniclabs.com".to_string(),
            chain_id: 146,
            explorer_url: "https://sonicscan.org".to_string(),
            native_symbol: "S".to_string(),
            rpc_timeout_secs: 10,
        }
    }
}

/// Custody signing service settings.
///
/// Credentials live in `ORCHESTRATOR_CUSTODY_*` environment variables, never
/// in the file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CustodyConfig {
    /// Base URL of the custody HTTP API.
    pub api_url: String,
}

impl Default for CustodyConfig {
    fn default() -> Self {
        Self { api_url: "https://api.privy.io/v1".to_string() }
    }
}

/// DEX-aggregator settings.
///
/// The request-signing secret lives in `ORCHESTRATOR_AGGREGATOR_SECRET`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Base URL of the aggregator HTTP API.
    pub api_url: String,

    /// Client identifier sent on every request.
    pub client_id: String,

    /// Source tag included in build requests.
    pub source: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://aggregator-api.kyberswap.com/sonic/api/v1".to_string(),
            client_id: "tx-orchestrator".to_string(),
            source: "tx-orchestrator".to_string(),
        }
    }
}

/// Bonding-curve launchpad settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LaunchpadConfig {
    /// Launchpad contract address.
    pub contract_address: String,
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self { contract_address: "0x1c55b1C160e8D398E7535C9Ec556914aeFb51ee7".to_string() }
    }
}

/// Token-search service settings for ticker lookup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenLookupConfig {
    /// Base URL of the token-search API.
    pub api_url: String,

    /// Chain tag used to filter search results.
    pub chain: String,
}

impl Default for TokenLookupConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.dexscreener.com/latest/dex".to_string(),
            chain: "sonic".to_string(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request timeout for the HTTP surface.
    ///
    /// Generous by default: a single request may span an approval wait plus
    /// a receipt wait.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0:8080".to_string(), request_timeout_secs: 300 }
    }
}

/// Pipeline tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bound on receipt waits before degrading to an indeterminate outcome.
    pub receipt_timeout_secs: u64,

    /// Default swap slippage tolerance in percent.
    pub default_slippage_percent: f64,

    /// Interval of the background polling loop.
    pub poll_interval_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            receipt_timeout_secs: 120,
            default_slippage_percent: 0.5,
            poll_interval_secs: 60,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Whether to start the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { metrics_enabled: false, metrics_address: "127.0.0.1:9090".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selects_existing_network() {
        let config = AppConfig::default();
        assert!(config.selected_network().is_some());
        assert_eq!(config.selected_network().unwrap().chain_id, 146);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            network = "testnet"

            [networks.testnet]
            rpc_url = "https://rpc.blaze.soniclabs.com"
            chain_id = 57054
            explorer_url = "https://testnet.sonicscan.org"
            native_symbol = "S"
            "#,
        )
        .unwrap();

        assert_eq!(config.network, "testnet");
        let network = config.selected_network().unwrap();
        assert_eq!(network.chain_id, 57054);
        // Unspecified fields fall back to defaults.
        assert_eq!(network.rpc_timeout_secs, 10);
        assert_eq!(config.pipeline.receipt_timeout_secs, 120);
    }
}
