//! Remote transaction signing through the custody service.
//!
//! # Responsibilities
//! - Translate the builder's transaction into the signer's wire convention
//! - Wrap it in the `eth_signTransaction` envelope
//! - Attach the authorization signature and credentials
//! - Decode the returned RLP-encoded signed transaction

use alloy::primitives::Bytes;
use serde_json::json;

use crate::config::CustodyConfig;
use crate::custody::auth::{RequestAuthorizer, APP_ID_HEADER, AUTH_SIGNATURE_HEADER};
use crate::custody::types::{
    Credentials, SignResponse, SignerTransaction, WalletId, AUTH_KEY_ENV_VAR,
};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::tx::UnsignedTx;

/// RPC method name understood by the custody signer.
const SIGN_METHOD: &str = "eth_signTransaction";

/// Client for the custody signing endpoint.
#[derive(Debug, Clone)]
pub struct RemoteSigner {
    http: reqwest::Client,
    config: CustodyConfig,
}

impl RemoteSigner {
    /// Create a signer client for the configured custody service.
    pub fn new(config: CustodyConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Sign an unsigned transaction with the given custody wallet.
    ///
    /// Returns the raw signed transaction bytes, ready to broadcast verbatim.
    pub async fn sign(&self, tx: &UnsignedTx, wallet: &WalletId) -> PipelineResult<Bytes> {
        let credentials = Credentials::from_env()?;
        let auth_key = std::env::var(AUTH_KEY_ENV_VAR).map_err(|_| {
            PipelineError::Configuration(format!("environment variable {AUTH_KEY_ENV_VAR} not set"))
        })?;
        let authorizer = RequestAuthorizer::from_secret(&auth_key, &credentials.app_id)?;

        let url = format!("{}/wallets/{wallet}/rpc", self.config.api_url.trim_end_matches('/'));
        let envelope = json!({
            "method": SIGN_METHOD,
            "params": { "transaction": SignerTransaction::from_unsigned(tx)? },
        });

        let signature = authorizer.sign_request("POST", &url, &envelope)?;

        tracing::debug!(%wallet, nonce = tx.nonce, gas = tx.gas, "Requesting remote signature");

        let response = self
            .http
            .post(&url)
            .header(APP_ID_HEADER, &credentials.app_id)
            .header(AUTH_SIGNATURE_HEADER, signature)
            .basic_auth(&credentials.app_id, Some(&credentials.app_secret))
            .json(&envelope)
            .send()
            .await
            .map_err(|e| PipelineError::transport("custody", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::upstream("custody", status.as_u16(), body));
        }

        let parsed: SignResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::transport("custody", format!("malformed signing response: {e}")))?;

        let signed = parsed
            .data
            .and_then(|d| d.signed_transaction)
            .ok_or_else(|| {
                PipelineError::transport("custody", "signing response carried no signed transaction")
            })?;

        let raw = hex::decode(signed.trim_start_matches("0x")).map_err(|e| {
            PipelineError::transport("custody", format!("signed transaction is not valid hex: {e}"))
        })?;

        tracing::debug!(%wallet, bytes = raw.len(), "Signed transaction received");
        Ok(Bytes::from(raw))
    }
}
