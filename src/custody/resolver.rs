//! Wallet identifier resolution against the custody service.
//!
//! # Responsibilities
//! - Map an opaque custody wallet id to its on-chain address
//! - Fall back to the environment-default wallet id
//! - Fail fast on missing credentials or upstream errors
//!
//! Resolution is re-run on every call. The lookup is cheap and a stale
//! address must never be used, so no cache is kept across invocations.

use alloy::primitives::Address;

use crate::config::CustodyConfig;
use crate::custody::auth::APP_ID_HEADER;
use crate::custody::types::{Credentials, WalletId, WalletResponse};
use crate::error::{PipelineError, PipelineResult};

/// Resolves custody wallet identifiers to on-chain addresses.
#[derive(Debug, Clone)]
pub struct WalletResolver {
    http: reqwest::Client,
    config: CustodyConfig,
}

impl WalletResolver {
    /// Create a resolver for the configured custody service.
    pub fn new(config: CustodyConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Resolve a wallet id (or the configured default) to its address.
    pub async fn resolve(&self, wallet: Option<&WalletId>) -> PipelineResult<Address> {
        let credentials = Credentials::from_env()?;
        let wallet = wallet
            .cloned()
            .or_else(|| credentials.default_wallet.clone())
            .ok_or_else(|| {
                PipelineError::Configuration(
                    "no wallet identifier provided and no default is configured".to_string(),
                )
            })?;

        let url = format!("{}/wallets/{wallet}", self.config.api_url.trim_end_matches('/'));
        tracing::debug!(%wallet, "Resolving wallet address");

        let response = self
            .http
            .get(&url)
            .header(APP_ID_HEADER, &credentials.app_id)
            .basic_auth(&credentials.app_id, Some(&credentials.app_secret))
            .send()
            .await
            .map_err(|e| PipelineError::transport("custody", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::upstream("custody", status.as_u16(), body));
        }

        let info: WalletResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::transport("custody", format!("malformed wallet response: {e}")))?;

        let address = info.address.ok_or_else(|| {
            PipelineError::transport("custody", "wallet response is missing the address field")
        })?;

        let address: Address = address.parse().map_err(|e| {
            PipelineError::transport("custody", format!("wallet address '{address}' is invalid: {e}"))
        })?;

        tracing::info!(%wallet, %address, "Wallet resolved");
        Ok(address)
    }
}
