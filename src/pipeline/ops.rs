//! Public pipeline operations, one per intent.
//!
//! The [`Orchestrator`] is the explicitly constructed context object: chain
//! client, custody clients, aggregator client, and configuration, injected
//! once at startup and passed to each operation. There is no global state;
//! every invocation is a single sequential chain of network calls.

use std::time::Duration;

use alloy::primitives::{Address, Bytes, U256};
use serde::Deserialize;

use crate::aggregator::AggregatorClient;
use crate::chain::erc20;
use crate::chain::units::{format_base_units, to_base_units, NATIVE_DECIMALS};
use crate::chain::ChainClient;
use crate::config::AppConfig;
use crate::custody::{RemoteSigner, WalletId, WalletResolver};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::approval::ensure_allowance;
use crate::pipeline::broadcast;
use crate::pipeline::builder::TxBuilder;
use crate::pipeline::launchpad;
use crate::pipeline::outcome::{
    BalanceOutcome, CreateTokenOutcome, SellOutcome, SellQuoteOutcome, SwapOutcome,
    SwapQuoteOutcome, TokenLookupOutcome, TransferOutcome,
};
use crate::tokens::TokenLookup;

/// Curve fee applied to sell quotes (0.5%).
const SELL_QUOTE_FEE: f64 = 0.005;
/// Slippage tolerance applied to the quoted minimum output (1%).
const SELL_QUOTE_SLIPPAGE: f64 = 0.01;
/// Below this native amount a quoted sale is considered unexecutable.
const SELL_QUOTE_DUST: f64 = 0.000_001;

/// Parameters for [`Orchestrator::get_balance`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BalanceParams {
    /// Address to read; defaults to the resolved custody wallet.
    #[serde(default)]
    pub address: Option<Address>,
    /// Token to read; defaults to the native balance.
    #[serde(default)]
    pub token_address: Option<Address>,
    #[serde(default)]
    pub wallet_id: Option<WalletId>,
}

/// Parameters for [`Orchestrator::transfer`].
#[derive(Debug, Clone, Deserialize)]
pub struct TransferParams {
    pub to_address: Address,
    /// Human-readable amount.
    pub amount: String,
    /// Token to move; absent for the native token.
    #[serde(default)]
    pub token_address: Option<Address>,
    #[serde(default)]
    pub wallet_id: Option<WalletId>,
}

/// Parameters for [`Orchestrator::swap`] and [`Orchestrator::swap_quote`].
#[derive(Debug, Clone, Deserialize)]
pub struct SwapParams {
    pub token_in: Address,
    pub token_out: Address,
    /// Human-readable input amount.
    pub amount: String,
    /// Slippage tolerance in percent; defaults from configuration.
    #[serde(default)]
    pub slippage: Option<f64>,
    #[serde(default)]
    pub wallet_id: Option<WalletId>,
}

/// Parameters for [`Orchestrator::create_token`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTokenParams {
    pub name: String,
    pub symbol: String,
    /// Native amount seeding the bonding curve, human-readable.
    pub initial_value: String,
    #[serde(default)]
    pub wallet_id: Option<WalletId>,
}

/// Parameters for [`Orchestrator::sell_token`].
#[derive(Debug, Clone, Deserialize)]
pub struct SellTokenParams {
    pub token_address: Address,
    /// Human-readable token amount to sell.
    pub token_amount: String,
    /// Minimum native output accepted, human-readable.
    pub min_native_out: String,
    #[serde(default)]
    pub wallet_id: Option<WalletId>,
}

/// Parameters for [`Orchestrator::get_sell_quote`].
#[derive(Debug, Clone, Deserialize)]
pub struct SellQuoteParams {
    pub token_address: Address,
    pub token_amount: String,
}

/// Dependency-injected context for all pipeline operations.
#[derive(Debug)]
pub struct Orchestrator {
    chain: ChainClient,
    resolver: WalletResolver,
    signer: RemoteSigner,
    aggregator: AggregatorClient,
    lookup: TokenLookup,
    launchpad: Address,
    native_symbol: String,
    receipt_wait: Duration,
    default_slippage_percent: f64,
}

impl Orchestrator {
    /// Construct the context from validated configuration.
    pub fn from_config(config: &AppConfig) -> PipelineResult<Self> {
        let network = config.selected_network().cloned().ok_or_else(|| {
            PipelineError::Configuration(format!("network profile '{}' not found", config.network))
        })?;
        let launchpad: Address = config.launchpad.contract_address.parse().map_err(|_| {
            PipelineError::Configuration(format!(
                "invalid launchpad address '{}'",
                config.launchpad.contract_address
            ))
        })?;

        Ok(Self {
            native_symbol: network.native_symbol.clone(),
            chain: ChainClient::new(network)?,
            resolver: WalletResolver::new(config.custody.clone()),
            signer: RemoteSigner::new(config.custody.clone()),
            aggregator: AggregatorClient::new(config.aggregator.clone()),
            lookup: TokenLookup::new(config.token_lookup.clone()),
            launchpad,
            receipt_wait: Duration::from_secs(config.pipeline.receipt_timeout_secs),
            default_slippage_percent: config.pipeline.default_slippage_percent,
        })
    }

    /// The chain client, for health checks on the control surface.
    pub fn chain(&self) -> &ChainClient {
        &self.chain
    }

    /// Native or token balance of an address (or the resolved wallet).
    pub async fn get_balance(&self, params: BalanceParams) -> PipelineResult<BalanceOutcome> {
        let address = match params.address {
            Some(address) => address,
            None => self.resolver.resolve(params.wallet_id.as_ref()).await?,
        };

        match params.token_address.filter(|t| !erc20::is_native(*t)) {
            None => {
                let raw = self.chain.get_balance(address).await?;
                Ok(BalanceOutcome {
                    address,
                    token: None,
                    amount: format_base_units(raw, NATIVE_DECIMALS),
                    symbol: Some(self.native_symbol.clone()),
                })
            }
            Some(token) => {
                let decimals = erc20::decimals(&self.chain, token).await?;
                let raw = erc20::balance_of(&self.chain, token, address).await?;
                Ok(BalanceOutcome {
                    address,
                    token: Some(token),
                    amount: format_base_units(raw, decimals),
                    symbol: None,
                })
            }
        }
    }

    /// Transfer native value or tokens.
    pub async fn transfer(&self, params: TransferParams) -> PipelineResult<TransferOutcome> {
        let from = self.resolver.resolve(params.wallet_id.as_ref()).await?;
        let wallet = self.effective_wallet(params.wallet_id)?;

        let (tx, raw) = TxBuilder::new(&self.chain)
            .transfer(from, params.to_address, params.token_address, &params.amount)
            .await?;

        let signed = self.signer.sign(&tx, &wallet).await?;
        let hash = broadcast::broadcast(&self.chain, &signed).await?;

        Ok(TransferOutcome {
            transaction_hash: hash,
            explorer_url: self.chain.explorer_tx_url(hash),
            amount_raw: raw.to_string(),
        })
    }

    /// Swap through the aggregator, gating on allowance for token inputs.
    pub async fn swap(&self, params: SwapParams) -> PipelineResult<SwapOutcome> {
        let from = self.resolver.resolve(params.wallet_id.as_ref()).await?;
        let wallet = self.effective_wallet(params.wallet_id.clone())?;

        let native_input = erc20::is_native(params.token_in);
        let decimals = erc20::decimals(&self.chain, params.token_in).await?;
        let raw_amount = to_base_units(&params.amount, decimals)?;

        let balance = erc20::balance_of(&self.chain, params.token_in, from).await?;
        if balance < raw_amount {
            return Err(PipelineError::Validation(format!(
                "insufficient balance: required {}, available {}",
                params.amount,
                format_base_units(balance, decimals)
            )));
        }

        let route = self
            .aggregator
            .get_route(params.token_in, params.token_out, raw_amount)
            .await?;

        let slippage = params.slippage.unwrap_or(self.default_slippage_percent);
        let tolerance = (slippage * 100.0).round() as u32;
        let encoded = self.aggregator.build_swap_data(&route, tolerance, from).await?;
        let call_data = decode_call_data(&encoded)?;

        // Token inputs need the router approved before the swap may be sent.
        let approval_tx = if native_input {
            None
        } else {
            ensure_allowance(
                &self.chain,
                &self.signer,
                &wallet,
                from,
                params.token_in,
                route.router_address,
                raw_amount,
                self.receipt_wait,
            )
            .await?
            .tx_hash
        };

        let value = if native_input { raw_amount } else { U256::ZERO };
        let tx = TxBuilder::new(&self.chain)
            .swap(from, route.router_address, call_data, value)
            .await?;

        let signed = self.signer.sign(&tx, &wallet).await?;
        let hash = broadcast::broadcast(&self.chain, &signed).await?;

        Ok(SwapOutcome {
            transaction_hash: hash,
            explorer_url: self.chain.explorer_tx_url(hash),
            approval_transaction_hash: approval_tx,
        })
    }

    /// Read-only quote for a swap.
    pub async fn swap_quote(&self, params: SwapParams) -> PipelineResult<SwapQuoteOutcome> {
        let decimals_in = erc20::decimals(&self.chain, params.token_in).await?;
        let raw_amount = to_base_units(&params.amount, decimals_in)?;

        let route = self
            .aggregator
            .get_route(params.token_in, params.token_out, raw_amount)
            .await?;

        let decimals_out = erc20::decimals(&self.chain, params.token_out).await?;
        let amount_out = route
            .amount_out()
            .and_then(|raw| raw.parse::<U256>().ok())
            .map(|raw| format_base_units(raw, decimals_out))
            .unwrap_or_else(|| "0".to_string());

        Ok(SwapQuoteOutcome {
            amount_in: params.amount,
            amount_out,
            price_impact: route.price_impact(),
        })
    }

    /// Launch a token on the bonding curve and confirm its creation.
    pub async fn create_token(&self, params: CreateTokenParams) -> PipelineResult<CreateTokenOutcome> {
        let from = self.resolver.resolve(params.wallet_id.as_ref()).await?;
        let wallet = self.effective_wallet(params.wallet_id)?;

        let seed = to_base_units(&params.initial_value, NATIVE_DECIMALS)?;
        let balance = self.chain.get_balance(from).await?;
        if balance < seed {
            return Err(PipelineError::Validation(format!(
                "insufficient balance: have {} {}, need at least {} plus gas",
                format_base_units(balance, NATIVE_DECIMALS),
                self.native_symbol,
                params.initial_value
            )));
        }

        let (tx, _raw) = TxBuilder::new(&self.chain)
            .create_token(from, self.launchpad, &params.name, &params.symbol, &params.initial_value)
            .await?;

        let signed = self.signer.sign(&tx, &wallet).await?;
        let hash = broadcast::broadcast(&self.chain, &signed).await?;
        let receipt = broadcast::confirm(&self.chain, hash, self.receipt_wait).await?;

        if !receipt.status() {
            return Err(PipelineError::ChainRejection(format!(
                "token creation reverted on-chain; see {}",
                self.chain.explorer_tx_url(hash)
            )));
        }

        let token_address = broadcast::extract_created_token(receipt.inner.logs(), self.launchpad);

        // Best effort: the creator's starting balance of the new token.
        let initial_balance = match token_address {
            Some(token) => self.read_token_balance(token, from).await,
            None => None,
        };

        if token_address.is_none() {
            tracing::warn!(%hash, "Creation receipt succeeded without a creation event");
        }

        Ok(CreateTokenOutcome {
            transaction_hash: hash,
            explorer_url: self.chain.explorer_tx_url(hash),
            token_address,
            token_explorer_url: token_address.map(|t| self.chain.explorer_token_url(t)),
            initial_balance,
            event_missing: token_address.is_none(),
        })
    }

    /// Sell a token back into the bonding curve and confirm the sale.
    pub async fn sell_token(&self, params: SellTokenParams) -> PipelineResult<SellOutcome> {
        let from = self.resolver.resolve(params.wallet_id.as_ref()).await?;
        let wallet = self.effective_wallet(params.wallet_id)?;

        let decimals = erc20::decimals(&self.chain, params.token_address).await?;
        let raw_amount = to_base_units(&params.token_amount, decimals)?;
        let raw_min_out = to_base_units(&params.min_native_out, NATIVE_DECIMALS)?;

        let balance = erc20::balance_of(&self.chain, params.token_address, from).await?;
        if balance < raw_amount {
            return Err(PipelineError::Validation(format!(
                "insufficient token balance: have {}, trying to sell {}",
                format_base_units(balance, decimals),
                params.token_amount
            )));
        }

        ensure_allowance(
            &self.chain,
            &self.signer,
            &wallet,
            from,
            params.token_address,
            self.launchpad,
            raw_amount,
            self.receipt_wait,
        )
        .await?;

        let tx = TxBuilder::new(&self.chain)
            .sell_token(from, self.launchpad, params.token_address, raw_amount, raw_min_out)
            .await?;

        let signed = self.signer.sign(&tx, &wallet).await?;
        let hash = broadcast::broadcast(&self.chain, &signed).await?;
        let receipt = broadcast::confirm(&self.chain, hash, self.receipt_wait).await?;

        if !receipt.status() {
            return Err(PipelineError::ChainRejection(format!(
                "sell transaction reverted on-chain; see {}",
                self.chain.explorer_tx_url(hash)
            )));
        }

        // Best effort; falls back to the caller's minimum when no transfer
        // log names the wallet as recipient.
        let received = broadcast::extract_native_received(receipt.inner.logs(), from);
        let (amount_received, received_is_estimate) = match received {
            Some(raw) => (format_base_units(raw, NATIVE_DECIMALS), false),
            None => (params.min_native_out.clone(), true),
        };

        Ok(SellOutcome {
            transaction_hash: hash,
            explorer_url: self.chain.explorer_tx_url(hash),
            amount_received,
            received_is_estimate,
        })
    }

    /// Quote a bonding-curve sale without submitting anything.
    pub async fn get_sell_quote(&self, params: SellQuoteParams) -> PipelineResult<SellQuoteOutcome> {
        let decimals = erc20::decimals(&self.chain, params.token_address).await?;
        let raw_amount = to_base_units(&params.token_amount, decimals)?;
        if raw_amount.is_zero() {
            return Err(PipelineError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }

        let raw_return =
            launchpad::curved_sell_return(&self.chain, self.launchpad, params.token_address, raw_amount)
                .await?;

        let gross: f64 = format_base_units(raw_return, NATIVE_DECIMALS).parse().unwrap_or(0.0);
        if gross <= SELL_QUOTE_DUST {
            return Err(PipelineError::Validation(
                "quoted return is negligible - amount too small or insufficient liquidity".to_string(),
            ));
        }

        let fee = gross * SELL_QUOTE_FEE;
        let estimated_output = gross - fee;
        let min_output = estimated_output * (1.0 - SELL_QUOTE_SLIPPAGE);

        let market_cap = self
            .estimate_market_cap(params.token_address, decimals, estimated_output, &params.token_amount)
            .await;

        Ok(SellQuoteOutcome {
            estimated_output: estimated_output.to_string(),
            min_output: min_output.to_string(),
            price_impact: "0.5".to_string(),
            fee: fee.to_string(),
            market_cap,
        })
    }

    /// Resolve a ticker symbol to a token address.
    pub async fn lookup_token(&self, ticker: &str) -> PipelineResult<TokenLookupOutcome> {
        let address = self.lookup.lookup(ticker, &self.native_symbol).await?;
        Ok(TokenLookupOutcome { ticker: ticker.to_string(), address })
    }

    /// The wallet id actually used for signing: the caller's, or the default.
    fn effective_wallet(&self, wallet: Option<WalletId>) -> PipelineResult<WalletId> {
        match wallet {
            Some(wallet) => Ok(wallet),
            None => crate::custody::types::Credentials::from_env()?
                .default_wallet
                .ok_or_else(|| {
                    PipelineError::Configuration(
                        "no wallet identifier provided and no default is configured".to_string(),
                    )
                }),
        }
    }

    /// Read a token balance without failing the surrounding operation.
    async fn read_token_balance(&self, token: Address, owner: Address) -> Option<String> {
        let decimals = erc20::decimals(&self.chain, token).await.ok()?;
        let raw = erc20::balance_of(&self.chain, token, owner).await.ok()?;
        Some(format_base_units(raw, decimals))
    }

    /// Simplified market cap: total supply times the implied token price.
    async fn estimate_market_cap(
        &self,
        token: Address,
        decimals: u8,
        estimated_output: f64,
        token_amount: &str,
    ) -> Option<String> {
        let amount: f64 = token_amount.parse().ok().filter(|a: &f64| *a > 0.0)?;
        let supply_raw = erc20::total_supply(&self.chain, token).await.ok()?;
        let supply: f64 = format_base_units(supply_raw, decimals).parse().ok()?;
        let price = estimated_output / amount;
        Some((supply * price).to_string())
    }
}

/// Decode aggregator call data from its hex string form.
fn decode_call_data(encoded: &str) -> PipelineResult<Bytes> {
    hex::decode(encoded.trim_start_matches("0x"))
        .map(Bytes::from)
        .map_err(|e| {
            PipelineError::transport("aggregator", format!("call data is not valid hex: {e}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sell_quote_arithmetic() {
        // A curve return of exactly 1.0 native unit.
        let gross: f64 = 1.0;
        let fee = gross * SELL_QUOTE_FEE;
        let estimated = gross - fee;
        let min = estimated * (1.0 - SELL_QUOTE_SLIPPAGE);

        assert!((fee - 0.005).abs() < 1e-12);
        assert!((estimated - 0.995).abs() < 1e-12);
        assert!((min - 0.98505).abs() < 1e-12);
    }

    #[test]
    fn test_decode_call_data() {
        assert_eq!(decode_call_data("0xdeadbeef").unwrap(), Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(decode_call_data("deadbeef").unwrap(), Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
        assert!(decode_call_data("0xzz").is_err());
    }

    #[test]
    fn test_orchestrator_from_default_config() {
        let orchestrator = Orchestrator::from_config(&AppConfig::default()).unwrap();
        assert_eq!(orchestrator.native_symbol, "S");
        assert_eq!(orchestrator.receipt_wait, Duration::from_secs(120));
    }

    #[test]
    fn test_bad_launchpad_address_is_configuration_error() {
        let mut config = AppConfig::default();
        config.launchpad.contract_address = "not-an-address".to_string();
        let err = Orchestrator::from_config(&config).unwrap_err();
        assert_eq!(err.category(), "configuration");
    }
}
