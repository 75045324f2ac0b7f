//! Unsigned transaction assembly, one method per intent.
//!
//! # Responsibilities
//! - Fetch a fresh nonce and fee quote per build
//! - Estimate gas through the node and apply the safety buffer
//! - Encode intent-specific calldata (ERC-20, launchpad, aggregator route)
//!
//! A failed decimals lookup, balance read, or gas estimation aborts the
//! build; the builder never substitutes defaults for fee, gas, or amount
//! fields.

use alloy::primitives::{Address, Bytes, U256};

use crate::chain::erc20;
use crate::chain::fees;
use crate::chain::units::to_base_units;
use crate::chain::ChainClient;
use crate::error::PipelineResult;
use crate::pipeline::launchpad;
use crate::pipeline::tx::UnsignedTx;

/// Assembles unsigned transactions against current chain state.
pub struct TxBuilder<'a> {
    chain: &'a ChainClient,
}

impl<'a> TxBuilder<'a> {
    /// Create a builder bound to a chain client.
    pub fn new(chain: &'a ChainClient) -> Self {
        Self { chain }
    }

    /// Native or token transfer.
    ///
    /// Returns the transaction and the raw amount moved, for logging.
    pub async fn transfer(
        &self,
        from: Address,
        to: Address,
        token: Option<Address>,
        amount: &str,
    ) -> PipelineResult<(UnsignedTx, U256)> {
        match token.filter(|t| !erc20::is_native(*t)) {
            None => {
                let raw = to_base_units(amount, erc20::decimals(self.chain, erc20::NATIVE_TOKEN).await?)?;
                let tx = self.assemble(from, to, raw, Vec::new()).await?;
                Ok((tx, raw))
            }
            Some(token) => {
                let decimals = erc20::decimals(self.chain, token).await?;
                let raw = to_base_units(amount, decimals)?;
                let data = erc20::transfer_calldata(to, raw);
                let tx = self.assemble(from, token, U256::ZERO, data).await?;
                Ok((tx, raw))
            }
        }
    }

    /// ERC-20 `approve(spender, rawAmount)`.
    pub async fn approval(
        &self,
        from: Address,
        token: Address,
        spender: Address,
        raw_amount: U256,
    ) -> PipelineResult<UnsignedTx> {
        let data = erc20::approve_calldata(spender, raw_amount);
        self.assemble(from, token, U256::ZERO, data).await
    }

    /// Aggregator-routed swap: call data goes to the router verbatim;
    /// `value` carries the native amount only for native-input swaps.
    pub async fn swap(
        &self,
        from: Address,
        router: Address,
        call_data: Bytes,
        native_value: U256,
    ) -> PipelineResult<UnsignedTx> {
        self.assemble(from, router, native_value, call_data.to_vec()).await
    }

    /// Launchpad `create(name, symbol)` with the curve seed as value.
    ///
    /// Returns the transaction and the raw seed amount.
    pub async fn create_token(
        &self,
        from: Address,
        launchpad: Address,
        name: &str,
        symbol: &str,
        native_amount: &str,
    ) -> PipelineResult<(UnsignedTx, U256)> {
        let raw = to_base_units(native_amount, crate::chain::units::NATIVE_DECIMALS)?;
        let data = launchpad::create_calldata(name, symbol);
        let tx = self.assemble(from, launchpad, raw, data).await?;
        Ok((tx, raw))
    }

    /// Launchpad `sell(token, rawTokenAmount, rawMinNativeOut)`.
    pub async fn sell_token(
        &self,
        from: Address,
        launchpad: Address,
        token: Address,
        raw_token_amount: U256,
        raw_min_native_out: U256,
    ) -> PipelineResult<UnsignedTx> {
        let data = launchpad::sell_calldata(token, raw_token_amount, raw_min_native_out);
        self.assemble(from, launchpad, U256::ZERO, data).await
    }

    /// Common assembly: fresh nonce, fee quote, node gas estimate + buffer.
    async fn assemble(
        &self,
        from: Address,
        to: Address,
        value: U256,
        data: Vec<u8>,
    ) -> PipelineResult<UnsignedTx> {
        let nonce = self.chain.transaction_count(from).await?;
        let fee_quote = fees::estimate(self.chain).await?;

        let mut tx = UnsignedTx {
            from,
            to,
            value,
            data: Bytes::from(data),
            nonce,
            chain_id: self.chain.chain_id(),
            max_fee_per_gas: fee_quote.max_fee,
            max_priority_fee_per_gas: fee_quote.max_priority_fee,
            gas: 0,
        };

        let estimated = self.chain.estimate_gas(tx.to_request()).await?;
        tx.gas = apply_gas_buffer(estimated);

        tracing::info!(
            %from,
            %to,
            nonce,
            estimated_gas = estimated,
            gas_limit = tx.gas,
            max_fee_per_gas = tx.max_fee_per_gas,
            max_priority_fee_per_gas = tx.max_priority_fee_per_gas,
            "Transaction assembled"
        );

        Ok(tx)
    }
}

/// Node estimate × 1.2, rounded up.
fn apply_gas_buffer(estimated: u64) -> u64 {
    estimated.saturating_mul(6).div_ceil(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_buffer_is_twenty_percent_ceiling() {
        assert_eq!(apply_gas_buffer(21_000), 25_200);
        assert_eq!(apply_gas_buffer(100_001), 120_002); // 120001.2 rounds up
        assert_eq!(apply_gas_buffer(0), 0);
        assert_eq!(apply_gas_buffer(1), 2); // 1.2 rounds up
    }
}
