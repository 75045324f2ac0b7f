//! Broadcast, confirmation, and receipt interpretation.
//!
//! # Responsibilities
//! - Submit signed transactions verbatim
//! - Poll for a mined receipt under a bounded timeout
//! - Extract intent-specific results from event logs
//!
//! Confirmation failure does not imply transaction failure: a timed-out wait
//! degrades to an indeterminate outcome carrying the hash, because the
//! transaction may still mine later.

use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::{Log, TransactionReceipt};
use alloy::sol_types::SolEvent;
use tokio::time::{interval, timeout};

use crate::chain::erc20::Transfer;
use crate::chain::ChainClient;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::launchpad::TokenCreated;

/// Receipt poll interval.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Submit a signed, RLP-encoded transaction.
pub async fn broadcast(chain: &ChainClient, raw: &Bytes) -> PipelineResult<TxHash> {
    let hash = chain.send_raw_transaction(raw).await?;
    crate::observability::metrics::record_broadcast();
    tracing::info!(%hash, "Transaction broadcast");
    Ok(hash)
}

/// Wait for a transaction's receipt, polling until `wait` elapses.
///
/// Returns the receipt whatever its status; callers decide what a failed
/// status means for their intent. A timeout becomes
/// [`PipelineError::Indeterminate`] with the explorer link attached.
pub async fn confirm(
    chain: &ChainClient,
    hash: TxHash,
    wait: Duration,
) -> PipelineResult<TransactionReceipt> {
    let result = timeout(wait, async {
        let mut ticker = interval(POLL_INTERVAL);
        loop {
            ticker.tick().await;
            match chain.transaction_receipt(hash).await? {
                Some(receipt) => return Ok(receipt),
                None => {
                    tracing::debug!(%hash, "Transaction pending");
                }
            }
        }
    })
    .await;

    match result {
        Ok(receipt) => receipt,
        Err(_) => Err(PipelineError::Indeterminate(format!(
            "not confirmed after {}s; track it at {}",
            wait.as_secs(),
            chain.explorer_tx_url(hash)
        ))),
    }
}

/// Find the token address announced by a `TokenCreated` event.
///
/// Only logs emitted by the launchpad itself are considered. `None` with a
/// successful receipt means "completed, event missing" - a distinct outcome,
/// not an error.
pub fn extract_created_token(logs: &[Log], launchpad: Address) -> Option<Address> {
    logs.iter()
        .filter(|log| log.address() == launchpad)
        .find_map(|log| {
            TokenCreated::decode_raw_log(log.topics(), log.data().data.as_ref())
                .ok()
                .map(|event| event.token)
        })
}

/// Find the native-equivalent amount received by `recipient`.
///
/// Matches the first ERC-20 `Transfer` log whose recipient topic equals the
/// wallet address. Best-effort: when a receipt carries several transfers
/// (fee routing, multi-hop), the first match may not be the payout, so
/// callers must flag the result as approximate.
pub fn extract_native_received(logs: &[Log], recipient: Address) -> Option<U256> {
    logs.iter().find_map(|log| {
        let event = Transfer::decode_raw_log(log.topics(), log.data().data.as_ref()).ok()?;
        (event.to == recipient).then_some(event.value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Log as PrimitiveLog, LogData, B256};

    fn rpc_log(address: Address, topics: Vec<B256>, data: Vec<u8>) -> Log {
        Log {
            inner: PrimitiveLog {
                address,
                data: LogData::new_unchecked(topics, data.into()),
            },
            ..Default::default()
        }
    }

    fn token_created_log(launchpad: Address, token: Address, creator: Address) -> Log {
        // Non-indexed params (name, symbol) live ABI-encoded in the data.
        use alloy::sol_types::SolValue;
        let data = ("Token".to_string(), "TKN".to_string()).abi_encode();
        rpc_log(
            launchpad,
            vec![
                TokenCreated::SIGNATURE_HASH,
                token.into_word(),
                creator.into_word(),
            ],
            data,
        )
    }

    fn transfer_log(token: Address, from: Address, to: Address, value: U256) -> Log {
        rpc_log(
            token,
            vec![Transfer::SIGNATURE_HASH, from.into_word(), to.into_word()],
            value.to_be_bytes::<32>().to_vec(),
        )
    }

    #[test]
    fn test_created_token_extracted_from_launchpad_log() {
        let launchpad = Address::repeat_byte(0x1c);
        let token = Address::repeat_byte(0x42);
        let creator = Address::repeat_byte(0xaa);

        let logs = vec![token_created_log(launchpad, token, creator)];
        assert_eq!(extract_created_token(&logs, launchpad), Some(token));
    }

    #[test]
    fn test_created_token_ignores_other_emitters() {
        let launchpad = Address::repeat_byte(0x1c);
        let token = Address::repeat_byte(0x42);
        let creator = Address::repeat_byte(0xaa);

        // Same shape, wrong emitting contract.
        let logs = vec![token_created_log(Address::repeat_byte(0x99), token, creator)];
        assert_eq!(extract_created_token(&logs, launchpad), None);
    }

    #[test]
    fn test_missing_event_yields_none() {
        let launchpad = Address::repeat_byte(0x1c);
        assert_eq!(extract_created_token(&[], launchpad), None);
    }

    #[test]
    fn test_native_received_matches_recipient_topic() {
        let wallet = Address::repeat_byte(0xaa);
        let other = Address::repeat_byte(0xbb);
        let token = Address::repeat_byte(0x10);

        let logs = vec![
            transfer_log(token, wallet, other, U256::from(7u64)),
            transfer_log(token, other, wallet, U256::from(995_000_000_000_000_000u128)),
        ];

        assert_eq!(
            extract_native_received(&logs, wallet),
            Some(U256::from(995_000_000_000_000_000u128))
        );
    }

    #[test]
    fn test_native_received_none_without_match() {
        let wallet = Address::repeat_byte(0xaa);
        let other = Address::repeat_byte(0xbb);
        let token = Address::repeat_byte(0x10);

        let logs = vec![transfer_log(token, wallet, other, U256::from(7u64))];
        assert_eq!(extract_native_received(&logs, wallet), None);
    }
}
