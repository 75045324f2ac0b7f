//! Bonding-curve launchpad contract surface.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::chain::ChainClient;
use crate::error::PipelineResult;

sol! {
    #[sol(rpc)]
    interface ILaunchpad {
        /// Launch a new token, seeding its curve with the attached value.
        function create(string name, string symbol) payable;

        /// Sell tokens back into the curve for native value.
        function sell(address tokenAddress, uint256 tokenAmount, uint256 minNativeOut);

        /// Quote the native return of selling along the curve.
        function calculateCurvedSellReturn(address tokenAddress, uint256 tokenAmount) view returns (uint256);
    }

    /// Emitted by the launchpad when a new token is created.
    #[derive(Debug)]
    event TokenCreated(address indexed token, address indexed creator, string name, string symbol);
}

/// Calldata for `create(name, symbol)`.
pub fn create_calldata(name: &str, symbol: &str) -> Vec<u8> {
    ILaunchpad::createCall { name: name.to_string(), symbol: symbol.to_string() }.abi_encode()
}

/// Calldata for `sell(token, tokenAmount, minNativeOut)`.
pub fn sell_calldata(token: Address, token_amount: U256, min_native_out: U256) -> Vec<u8> {
    ILaunchpad::sellCall { tokenAddress: token, tokenAmount: token_amount, minNativeOut: min_native_out }
        .abi_encode()
}

/// Read the curve's raw native return for selling `token_amount`.
pub async fn curved_sell_return(
    chain: &ChainClient,
    launchpad: Address,
    token: Address,
    token_amount: U256,
) -> PipelineResult<U256> {
    let contract = ILaunchpad::new(launchpad, chain.provider());
    chain
        .rpc(
            "calculateCurvedSellReturn",
            contract.calculateCurvedSellReturn(token, token_amount).call(),
        )
        .await
}
