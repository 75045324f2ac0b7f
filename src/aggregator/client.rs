//! DEX-aggregator client: route discovery and call-data encoding.
//!
//! # Responsibilities
//! - Query the best route for a token pair and raw input amount
//! - Request ABI-encoded call data for a chosen route
//! - Sign build requests with the symmetric HMAC scheme
//!
//! The HMAC request signature here is intentionally separate from the
//! custody authorization signature: symmetric shared-secret versus
//! asymmetric key, for a different upstream with a different trust model.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, U256};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::aggregator::types::{BuildRequest, BuildResponse, RouteResponse, SwapRoute};
use crate::canonical::to_canonical_string;
use crate::config::AggregatorConfig;
use crate::error::{PipelineError, PipelineResult};

type HmacSha256 = Hmac<Sha256>;

/// Environment variable holding the aggregator request-signing secret.
pub const SIGNING_SECRET_ENV_VAR: &str = "ORCHESTRATOR_AGGREGATOR_SECRET";

/// Client identifier header.
pub const CLIENT_ID_HEADER: &str = "x-client-id";
/// Unix-timestamp header accompanying signed build requests.
pub const TIMESTAMP_HEADER: &str = "x-timestamp";
/// HMAC signature header for build requests.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Seconds a built route stays executable.
const BUILD_DEADLINE_SECS: u64 = 1200;

/// Client for the aggregator HTTP API.
#[derive(Debug, Clone)]
pub struct AggregatorClient {
    http: reqwest::Client,
    config: AggregatorConfig,
}

impl AggregatorClient {
    /// Create a client for the configured aggregator.
    pub fn new(config: AggregatorConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Query the best route for swapping `amount_raw` of `token_in` into
    /// `token_out`. The amount is already in the input token's base units.
    pub async fn get_route(
        &self,
        token_in: Address,
        token_out: Address,
        amount_raw: U256,
    ) -> PipelineResult<SwapRoute> {
        let url = format!("{}/routes", self.config.api_url.trim_end_matches('/'));

        tracing::debug!(%token_in, %token_out, %amount_raw, "Querying swap route");

        let response = self
            .http
            .get(&url)
            .header(CLIENT_ID_HEADER, &self.config.client_id)
            .query(&[
                ("tokenIn", token_in.to_string()),
                ("tokenOut", token_out.to_string()),
                ("amountIn", amount_raw.to_string()),
                ("gasInclude", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::transport("aggregator", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::upstream("aggregator", status.as_u16(), body));
        }

        let parsed: RouteResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::transport("aggregator", format!("malformed route response: {e}")))?;

        if parsed.code != 0 {
            return Err(PipelineError::upstream(
                "aggregator",
                status.as_u16(),
                parsed.message.unwrap_or_else(|| format!("route lookup failed with code {}", parsed.code)),
            ));
        }

        let data = parsed.data.ok_or_else(|| {
            PipelineError::transport("aggregator", "route response carried no data")
        })?;
        let route_summary = data.route_summary.ok_or_else(|| {
            PipelineError::transport("aggregator", "route response carried no route summary")
        })?;
        let router_address: Address = data
            .router_address
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| {
                PipelineError::transport("aggregator", "route response carried no valid router address")
            })?;

        Ok(SwapRoute { route_summary, router_address })
    }

    /// Request the ABI-encoded call data implementing a route.
    ///
    /// `slippage_tolerance` is an integer, percent × 100. Returns the encoded
    /// call data as a hex string.
    pub async fn build_swap_data(
        &self,
        route: &SwapRoute,
        slippage_tolerance: u32,
        sender: Address,
    ) -> PipelineResult<String> {
        let url = format!("{}/route/build", self.config.api_url.trim_end_matches('/'));
        let now = unix_now();

        let payload = BuildRequest {
            route_summary: route.route_summary.clone(),
            sender: sender.to_string(),
            recipient: sender.to_string(),
            slippage_tolerance,
            deadline: now + BUILD_DEADLINE_SECS,
            source: self.config.source.clone(),
        };

        let signature = self.sign_build_request(now, &payload)?;

        let response = self
            .http
            .post(&url)
            .header(CLIENT_ID_HEADER, &self.config.client_id)
            .header(TIMESTAMP_HEADER, now.to_string())
            .header(SIGNATURE_HEADER, signature)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PipelineError::transport("aggregator", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::upstream("aggregator", status.as_u16(), body));
        }

        let parsed: BuildResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::transport("aggregator", format!("malformed build response: {e}")))?;

        if parsed.code != 0 {
            return Err(PipelineError::upstream(
                "aggregator",
                status.as_u16(),
                parsed.message.unwrap_or_else(|| format!("route build failed with code {}", parsed.code)),
            ));
        }

        parsed
            .data
            .and_then(|d| d.data)
            .ok_or_else(|| PipelineError::transport("aggregator", "build response carried no call data"))
    }

    /// HMAC-SHA256 over `"<timestamp>|<canonical json>"` with the shared
    /// secret, hex-encoded.
    fn sign_build_request(&self, timestamp: u64, payload: &BuildRequest) -> PipelineResult<String> {
        let secret = std::env::var(SIGNING_SECRET_ENV_VAR).map_err(|_| {
            PipelineError::Configuration(format!(
                "environment variable {SIGNING_SECRET_ENV_VAR} not set"
            ))
        })?;

        let message = format!("{timestamp}|{}", to_canonical_string(payload)?);
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| PipelineError::Configuration(format!("invalid aggregator secret: {e}")))?;
        mac.update(message.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client() -> AggregatorClient {
        AggregatorClient::new(AggregatorConfig::default())
    }

    #[test]
    fn test_hmac_signature_matches_reference() {
        std::env::set_var(SIGNING_SECRET_ENV_VAR, "test-secret");
        let client = test_client();

        let payload = BuildRequest {
            route_summary: json!({"amountOut": "1"}),
            sender: "0xaa".to_string(),
            recipient: "0xaa".to_string(),
            slippage_tolerance: 50,
            deadline: 1_700_001_200,
            source: "tx-orchestrator".to_string(),
        };

        let signature = client.sign_build_request(1_700_000_000, &payload).unwrap();

        // Reference: HMAC-SHA256(secret, "<ts>|<canonical json>")
        let message = format!("1700000000|{}", to_canonical_string(&payload).unwrap());
        let mut mac = HmacSha256::new_from_slice(b"test-secret").unwrap();
        mac.update(message.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(signature, expected);
        assert_eq!(signature.len(), 64);
    }

    #[test]
    fn test_hmac_changes_with_timestamp() {
        std::env::set_var(SIGNING_SECRET_ENV_VAR, "test-secret");
        let client = test_client();
        let payload = BuildRequest {
            route_summary: json!({}),
            sender: "0xaa".to_string(),
            recipient: "0xaa".to_string(),
            slippage_tolerance: 50,
            deadline: 1_700_001_200,
            source: "s".to_string(),
        };

        let first = client.sign_build_request(1, &payload).unwrap();
        let second = client.sign_build_request(2, &payload).unwrap();
        assert_ne!(first, second);
    }
}
