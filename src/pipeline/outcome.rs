//! Structured success payloads for the public operations.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;

/// Balance of a wallet in a given token (or the native token).
#[derive(Debug, Clone, Serialize)]
pub struct BalanceOutcome {
    /// Address the balance was read for.
    pub address: Address,
    /// Token queried; absent for the native balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Address>,
    /// Human-readable amount.
    pub amount: String,
    /// Ticker symbol, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Result of a broadcast transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferOutcome {
    pub transaction_hash: TxHash,
    pub explorer_url: String,
    /// Raw base units moved, echoed for logging.
    pub amount_raw: String,
}

/// Result of a broadcast swap.
#[derive(Debug, Clone, Serialize)]
pub struct SwapOutcome {
    pub transaction_hash: TxHash,
    pub explorer_url: String,
    /// Hash of the approval that gated this swap, when one was needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_transaction_hash: Option<TxHash>,
}

/// Read-only swap quote.
#[derive(Debug, Clone, Serialize)]
pub struct SwapQuoteOutcome {
    pub amount_in: String,
    pub amount_out: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_impact: Option<f64>,
}

/// Result of a confirmed token creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTokenOutcome {
    pub transaction_hash: TxHash,
    pub explorer_url: String,
    /// Address announced by the creation event; absent when the receipt
    /// succeeded but carried no such event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_explorer_url: Option<String>,
    /// Creator's balance of the new token, when readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<String>,
    /// True when the receipt succeeded without a creation event.
    pub event_missing: bool,
}

/// Result of a confirmed token sale.
#[derive(Debug, Clone, Serialize)]
pub struct SellOutcome {
    pub transaction_hash: TxHash,
    pub explorer_url: String,
    /// Native-equivalent amount received.
    pub amount_received: String,
    /// True when no matching transfer log was found and `amount_received`
    /// falls back to the requested minimum output.
    pub received_is_estimate: bool,
}

/// Read-only bonding-curve sell quote.
#[derive(Debug, Clone, Serialize)]
pub struct SellQuoteOutcome {
    pub estimated_output: String,
    pub min_output: String,
    pub price_impact: String,
    pub fee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<String>,
}

/// Result of a ticker lookup.
#[derive(Debug, Clone, Serialize)]
pub struct TokenLookupOutcome {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}
