//! Custody wire types and credential loading.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::tx::UnsignedTx;

/// Environment variable holding the custody application id.
pub const APP_ID_ENV_VAR: &str = "ORCHESTRATOR_CUSTODY_APP_ID";
/// Environment variable holding the custody application secret.
pub const APP_SECRET_ENV_VAR: &str = "ORCHESTRATOR_CUSTODY_APP_SECRET";
/// Environment variable holding the default wallet identifier.
pub const WALLET_ID_ENV_VAR: &str = "ORCHESTRATOR_CUSTODY_WALLET_ID";
/// Environment variable holding the request-authorization private key.
pub const AUTH_KEY_ENV_VAR: &str = "ORCHESTRATOR_CUSTODY_AUTH_KEY";

/// Opaque identifier naming a wallet inside the custody service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(pub String);

impl std::fmt::Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Custody API credentials, read from the environment on every use so that
/// rotated secrets take effect without a restart.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
    pub default_wallet: Option<WalletId>,
}

impl Credentials {
    /// Load credentials from the environment.
    pub fn from_env() -> PipelineResult<Self> {
        let app_id = require_env(APP_ID_ENV_VAR)?;
        let app_secret = require_env(APP_SECRET_ENV_VAR)?;
        let default_wallet = std::env::var(WALLET_ID_ENV_VAR).ok().map(WalletId);
        Ok(Self { app_id, app_secret, default_wallet })
    }
}

fn require_env(name: &'static str) -> PipelineResult<String> {
    std::env::var(name)
        .map_err(|_| PipelineError::Configuration(format!("environment variable {name} not set")))
}

/// Transaction rendered in the signer's wire convention: snake_case field
/// names, hex-encoded fee/gas fields, decimal `nonce`/`chain_id`/`value`.
#[derive(Debug, Clone, Serialize)]
pub struct SignerTransaction {
    pub nonce: u64,
    pub chain_id: u64,
    pub to: String,
    pub value: u128,
    /// Call data; the empty-call sentinel `0x` when the transaction has none.
    pub data: String,
    #[serde(rename = "type")]
    pub tx_type: u8,
    pub gas_limit: String,
    pub max_fee_per_gas: String,
    pub max_priority_fee_per_gas: String,
}

impl SignerTransaction {
    /// Translate the builder's descriptor into the signer's convention.
    pub fn from_unsigned(tx: &UnsignedTx) -> PipelineResult<Self> {
        let value: u128 = tx.value.try_into().map_err(|_| {
            PipelineError::Validation("transaction value exceeds the signer's integer range".to_string())
        })?;

        let data = if tx.data.is_empty() { "0x".to_string() } else { format!("{}", tx.data) };

        Ok(Self {
            nonce: tx.nonce,
            chain_id: tx.chain_id,
            to: format!("{}", tx.to),
            value,
            data,
            tx_type: crate::pipeline::tx::EIP1559_TX_TYPE,
            gas_limit: format!("{:#x}", tx.gas),
            max_fee_per_gas: format!("{:#x}", tx.max_fee_per_gas),
            max_priority_fee_per_gas: format!("{:#x}", tx.max_priority_fee_per_gas),
        })
    }
}

/// `GET /wallets/{id}` response body.
#[derive(Debug, Deserialize)]
pub struct WalletResponse {
    pub address: Option<String>,
}

/// `POST /wallets/{id}/rpc` response body.
#[derive(Debug, Deserialize)]
pub struct SignResponse {
    #[serde(default)]
    pub data: Option<SignResponseData>,
}

/// Payload of a successful signing response.
#[derive(Debug, Deserialize)]
pub struct SignResponseData {
    pub signed_transaction: Option<String>,
}
