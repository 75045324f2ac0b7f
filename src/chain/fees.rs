//! EIP-1559 fee quoting.
//!
//! # Responsibilities
//! - Read the latest block's base fee
//! - Fall back to the legacy gas price on pre-EIP-1559 nodes
//! - Derive the max/priority fee pair used by every built transaction
//!
//! Fees are never cached: base-fee volatility makes staleness unacceptable.

use crate::chain::client::ChainClient;
use crate::error::PipelineResult;

/// Fixed priority fee: 1 gwei in wei.
pub const MAX_PRIORITY_FEE_WEI: u128 = 1_000_000_000;

/// An EIP-1559 fee quote, all values in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    /// Latest block base fee (or legacy gas price on old nodes).
    pub base_fee: u128,
    /// Fixed priority fee.
    pub max_priority_fee: u128,
    /// Fee cap: twice the base fee plus the priority fee.
    pub max_fee: u128,
}

impl FeeQuote {
    /// Derive the fee pair from a base fee.
    pub fn from_base_fee(base_fee: u128) -> Self {
        Self {
            base_fee,
            max_priority_fee: MAX_PRIORITY_FEE_WEI,
            max_fee: base_fee * 2 + MAX_PRIORITY_FEE_WEI,
        }
    }
}

/// Quote fees from current node state.
pub async fn estimate(chain: &ChainClient) -> PipelineResult<FeeQuote> {
    let base_fee = match chain.latest_base_fee().await? {
        Some(base_fee) => u128::from(base_fee),
        // Pre-EIP-1559 node: treat the legacy gas price as the base fee.
        None => chain.gas_price().await?,
    };

    let quote = FeeQuote::from_base_fee(base_fee);
    tracing::debug!(
        base_fee = quote.base_fee,
        max_priority_fee = quote.max_priority_fee,
        max_fee = quote.max_fee,
        "Fee quote derived"
    );
    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_invariant_holds_for_any_base_fee() {
        for base_fee in [0u128, 1, 1_000_000_000, 25_000_000_000, u64::MAX as u128] {
            let quote = FeeQuote::from_base_fee(base_fee);
            assert_eq!(quote.max_fee, 2 * base_fee + quote.max_priority_fee);
            assert_eq!(quote.max_priority_fee, MAX_PRIORITY_FEE_WEI);
        }
    }

    #[test]
    fn test_zero_base_fee() {
        let quote = FeeQuote::from_base_fee(0);
        assert_eq!(quote.max_fee, MAX_PRIORITY_FEE_WEI);
    }
}
