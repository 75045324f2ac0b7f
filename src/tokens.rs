//! Token ticker lookup against the token-search service.
//!
//! Best-effort convenience resolution: the native symbol short-circuits to
//! the native sentinel, anything else is searched upstream and filtered to
//! the configured chain. A failed or empty search is `None`, never an error.

use alloy::primitives::Address;
use serde::Deserialize;

use crate::chain::erc20::NATIVE_TOKEN;
use crate::config::TokenLookupConfig;
use crate::error::PipelineResult;

/// Search response: a list of trading pairs.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    pairs: Option<Vec<Pair>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pair {
    #[serde(default)]
    chain_id: Option<String>,
    #[serde(default)]
    fdv: Option<f64>,
    #[serde(default)]
    base_token: Option<BaseToken>,
}

#[derive(Debug, Deserialize)]
struct BaseToken {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

/// Client for ticker → token-address lookup.
#[derive(Debug, Clone)]
pub struct TokenLookup {
    http: reqwest::Client,
    config: TokenLookupConfig,
}

impl TokenLookup {
    /// Create a lookup client.
    pub fn new(config: TokenLookupConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Resolve a ticker symbol to a token address on the configured chain.
    ///
    /// Exact symbol matches only, highest fully-diluted valuation first.
    pub async fn lookup(&self, ticker: &str, native_symbol: &str) -> PipelineResult<Option<Address>> {
        if ticker.eq_ignore_ascii_case(native_symbol) {
            return Ok(Some(NATIVE_TOKEN));
        }

        let url = format!("{}/search", self.config.api_url.trim_end_matches('/'));
        let response = match self.http.get(&url).query(&[("q", ticker)]).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(ticker, error = %e, "Token search request failed");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            tracing::warn!(ticker, status = %response.status(), "Token search returned an error");
            return Ok(None);
        }

        let parsed: SearchResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(ticker, error = %e, "Token search response was malformed");
                return Ok(None);
            }
        };

        let mut candidates: Vec<Pair> = parsed
            .pairs
            .unwrap_or_default()
            .into_iter()
            .filter(|pair| pair.chain_id.as_deref() == Some(self.config.chain.as_str()))
            .filter(|pair| {
                pair.base_token
                    .as_ref()
                    .and_then(|t| t.symbol.as_deref())
                    .is_some_and(|symbol| symbol.eq_ignore_ascii_case(ticker))
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.fdv.unwrap_or(0.0).partial_cmp(&a.fdv.unwrap_or(0.0)).unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(candidates
            .into_iter()
            .find_map(|pair| pair.base_token?.address?.parse().ok()))
    }
}
