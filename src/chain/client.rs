//! Chain JSON-RPC client with timeouts and error classification.
//!
//! # Responsibilities
//! - Connect to the configured node endpoint
//! - Wrap every RPC call in a bounded timeout
//! - Classify failures: node-level rejections vs transport faults
//! - Format block-explorer links for caller-facing payloads

use std::fmt::Display;
use std::future::IntoFuture;
use std::time::Duration;

use alloy::eips::BlockId;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::timeout;

use crate::config::NetworkConfig;
use crate::error::{is_node_rejection, normalize_node_message, PipelineError, PipelineResult};

/// Chain node client. Cheap to clone; all state is the connection itself.
#[derive(Clone)]
pub struct ChainClient {
    provider: DynProvider,
    network: NetworkConfig,
    timeout: Duration,
}

impl ChainClient {
    /// Connect to the network's RPC endpoint.
    pub fn new(network: NetworkConfig) -> PipelineResult<Self> {
        let url: url::Url = network.rpc_url.parse().map_err(|e| {
            PipelineError::Configuration(format!("invalid RPC URL '{}': {e}", network.rpc_url))
        })?;
        let timeout = Duration::from_secs(network.rpc_timeout_secs);
        let provider = ProviderBuilder::new().connect_http(url).erased();

        tracing::info!(
            rpc_url = %network.rpc_url,
            chain_id = network.chain_id,
            "Chain client initialized"
        );

        Ok(Self { provider, network, timeout })
    }

    /// The underlying provider, for contract instances.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Configured chain id.
    pub fn chain_id(&self) -> u64 {
        self.network.chain_id
    }

    /// Block-explorer link for a transaction.
    pub fn explorer_tx_url(&self, hash: TxHash) -> String {
        format!("{}/tx/{hash}", self.network.explorer_url.trim_end_matches('/'))
    }

    /// Block-explorer link for a token contract.
    pub fn explorer_token_url(&self, token: Address) -> String {
        format!("{}/token/{token}", self.network.explorer_url.trim_end_matches('/'))
    }

    /// Run an RPC future under the client timeout, classifying failures.
    ///
    /// Node-reported rejections (reverts, underpricing, nonce/funds issues)
    /// become [`PipelineError::ChainRejection`]; everything else is an
    /// upstream fault of the chain node.
    pub async fn rpc<T, E: Display>(
        &self,
        op: &'static str,
        fut: impl IntoFuture<Output = Result<T, E>>,
    ) -> PipelineResult<T> {
        match timeout(self.timeout, fut.into_future()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                let raw = e.to_string();
                if is_node_rejection(&raw) {
                    Err(PipelineError::ChainRejection(normalize_node_message(&raw)))
                } else {
                    Err(PipelineError::transport("chain node", format!("{op}: {raw}")))
                }
            }
            Err(_) => Err(PipelineError::transport(
                "chain node",
                format!("{op}: timed out after {}s", self.timeout.as_secs()),
            )),
        }
    }

    /// Base fee of the latest block, `None` on pre-EIP-1559 nodes.
    pub async fn latest_base_fee(&self) -> PipelineResult<Option<u64>> {
        let block = self
            .rpc("eth_getBlockByNumber", self.provider.get_block(BlockId::latest()))
            .await?
            .ok_or_else(|| PipelineError::transport("chain node", "no latest block".to_string()))?;
        Ok(block.header.base_fee_per_gas)
    }

    /// Legacy gas price in wei.
    pub async fn gas_price(&self) -> PipelineResult<u128> {
        self.rpc("eth_gasPrice", self.provider.get_gas_price()).await
    }

    /// Native balance of an address.
    pub async fn get_balance(&self, address: Address) -> PipelineResult<U256> {
        self.rpc("eth_getBalance", self.provider.get_balance(address)).await
    }

    /// Transaction count (next nonce) of an address.
    pub async fn transaction_count(&self, address: Address) -> PipelineResult<u64> {
        self.rpc("eth_getTransactionCount", self.provider.get_transaction_count(address)).await
    }

    /// Node gas estimate for a transaction request.
    ///
    /// Failures propagate; the builder never substitutes a default limit.
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> PipelineResult<u64> {
        self.rpc("eth_estimateGas", self.provider.estimate_gas(tx)).await
    }

    /// Submit a signed, RLP-encoded transaction and return its hash.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> PipelineResult<TxHash> {
        let pending = self
            .rpc("eth_sendRawTransaction", self.provider.send_raw_transaction(raw))
            .await?;
        Ok(*pending.tx_hash())
    }

    /// Receipt for a transaction hash, `None` while pending.
    pub async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> PipelineResult<Option<TransactionReceipt>> {
        self.rpc("eth_getTransactionReceipt", self.provider.get_transaction_receipt(hash)).await
    }

    /// Verify the connected node matches the configured chain id.
    pub async fn verify_chain_id(&self) -> PipelineResult<()> {
        let actual = self.rpc("eth_chainId", self.provider.get_chain_id()).await?;
        if actual != self.network.chain_id {
            return Err(PipelineError::Configuration(format!(
                "chain id mismatch: configured {}, node reports {actual}",
                self.network.chain_id
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.network.rpc_url)
            .field("chain_id", &self.network.chain_id)
            .field("timeout_secs", &self.timeout.as_secs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;

    fn test_network() -> NetworkConfig {
        NetworkConfig {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            explorer_url: "https://explorer.example.org/".to_string(),
            native_symbol: "ETH".to_string(),
            rpc_timeout_secs: 5,
        }
    }

    #[test]
    fn test_explorer_links_strip_trailing_slash() {
        let client = ChainClient::new(test_network()).unwrap();
        let hash: TxHash = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b"
            .parse()
            .unwrap();
        assert_eq!(
            client.explorer_tx_url(hash),
            format!("https://explorer.example.org/tx/{hash}")
        );
        assert!(client.explorer_token_url(Address::ZERO).starts_with("https://explorer.example.org/token/0x"));
    }

    #[test]
    fn test_invalid_rpc_url_is_configuration_error() {
        let mut network = test_network();
        network.rpc_url = "not a url".to_string();
        let err = ChainClient::new(network).unwrap_err();
        assert_eq!(err.category(), "configuration");
    }
}
