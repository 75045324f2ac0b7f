//! Unsigned transaction descriptor.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;

/// EIP-1559 transaction type tag.
pub const EIP1559_TX_TYPE: u8 = 2;

/// An unsigned EIP-1559 transaction, fully populated by the builder.
///
/// One descriptor is produced per intent and handed to the remote signer
/// exactly once; a fresh nonce makes every descriptor single-use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTx {
    /// Sender address (resolved custody wallet).
    pub from: Address,
    /// Destination; always present for the supported intents.
    pub to: Address,
    /// Native value in wei.
    pub value: U256,
    /// Call data; empty for plain native transfers.
    pub data: Bytes,
    /// Fresh chain nonce for `from`.
    pub nonce: u64,
    /// Chain id for replay protection.
    pub chain_id: u64,
    /// Fee cap in wei.
    pub max_fee_per_gas: u128,
    /// Priority fee in wei.
    pub max_priority_fee_per_gas: u128,
    /// Gas limit (node estimate with buffer applied).
    pub gas: u64,
}

impl UnsignedTx {
    /// Render as an RPC transaction request (used for gas estimation before
    /// the limit is known; `gas` itself is not set here).
    pub fn to_request(&self) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.to)
            .with_value(self.value)
            .with_input(self.data.clone())
            .with_nonce(self.nonce)
            .with_chain_id(self.chain_id)
            .with_max_fee_per_gas(self.max_fee_per_gas)
            .with_max_priority_fee_per_gas(self.max_priority_fee_per_gas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_fee_fields() {
        let tx = UnsignedTx {
            from: Address::ZERO,
            to: Address::repeat_byte(0x11),
            value: U256::from(1u64),
            data: Bytes::new(),
            nonce: 7,
            chain_id: 146,
            max_fee_per_gas: 51_000_000_000,
            max_priority_fee_per_gas: 1_000_000_000,
            gas: 21_000,
        };

        let request = tx.to_request();
        assert_eq!(request.nonce, Some(7));
        assert_eq!(request.chain_id, Some(146));
        assert_eq!(request.max_fee_per_gas, Some(51_000_000_000));
        assert_eq!(request.max_priority_fee_per_gas, Some(1_000_000_000));
        assert_eq!(request.gas, None);
    }
}
