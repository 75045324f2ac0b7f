//! ERC-20 interface: read calls and calldata builders.

use alloy::primitives::{address, Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::chain::client::ChainClient;
use crate::chain::units::NATIVE_DECIMALS;
use crate::error::PipelineResult;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function transfer(address to, uint256 amount) returns (bool);
        function approve(address spender, uint256 amount) returns (bool);
        function balanceOf(address owner) view returns (uint256);
        function allowance(address owner, address spender) view returns (uint256);
        function decimals() view returns (uint8);
        function totalSupply() view returns (uint256);
    }

    /// Standard ERC-20 transfer event, used for receipt interpretation.
    #[derive(Debug)]
    event Transfer(address indexed from, address indexed to, uint256 value);
}

/// Sentinel address representing the chain's native token.
pub const NATIVE_TOKEN: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Whether the given token reference is the native-token sentinel.
pub fn is_native(token: Address) -> bool {
    token == NATIVE_TOKEN
}

/// Fetch a token's decimals; the native sentinel is fixed at 18.
pub async fn decimals(chain: &ChainClient, token: Address) -> PipelineResult<u8> {
    if is_native(token) {
        return Ok(NATIVE_DECIMALS);
    }
    let contract = IERC20::new(token, chain.provider());
    chain
        .rpc("decimals", contract.decimals().call())
        .await
}

/// Fetch a holder's balance: native balance for the sentinel, `balanceOf`
/// otherwise.
pub async fn balance_of(chain: &ChainClient, token: Address, owner: Address) -> PipelineResult<U256> {
    if is_native(token) {
        return chain.get_balance(owner).await;
    }
    let contract = IERC20::new(token, chain.provider());
    chain.rpc("balanceOf", contract.balanceOf(owner).call()).await
}

/// Read the current allowance(owner, spender) of a token.
pub async fn allowance(
    chain: &ChainClient,
    token: Address,
    owner: Address,
    spender: Address,
) -> PipelineResult<U256> {
    let contract = IERC20::new(token, chain.provider());
    chain.rpc("allowance", contract.allowance(owner, spender).call()).await
}

/// Read a token's total supply.
pub async fn total_supply(chain: &ChainClient, token: Address) -> PipelineResult<U256> {
    let contract = IERC20::new(token, chain.provider());
    chain.rpc("totalSupply", contract.totalSupply().call()).await
}

/// Calldata for `transfer(to, amount)`.
pub fn transfer_calldata(to: Address, amount: U256) -> Vec<u8> {
    IERC20::transferCall { to, amount }.abi_encode()
}

/// Calldata for `approve(spender, amount)`.
pub fn approve_calldata(spender: Address, amount: U256) -> Vec<u8> {
    IERC20::approveCall { spender, amount }.abi_encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_sentinel() {
        assert!(is_native(NATIVE_TOKEN));
        assert!(!is_native(Address::ZERO));
    }

    #[test]
    fn test_transfer_calldata_selector() {
        let data = transfer_calldata(Address::ZERO, U256::from(1u64));
        // transfer(address,uint256) selector
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 4 + 32 + 32);
    }

    #[test]
    fn test_approve_calldata_selector() {
        let data = approve_calldata(Address::ZERO, U256::MAX);
        // approve(address,uint256) selector
        assert_eq!(&data[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(data.len(), 4 + 32 + 32);
    }
}
