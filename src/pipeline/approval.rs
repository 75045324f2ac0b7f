//! Allowance gating before swaps and sales.
//!
//! A dependent transaction must never be submitted while its approval is
//! merely pending: the flow blocks until the approval receipt is mined, then
//! re-reads the allowance. This is the only automatic recovery action in the
//! pipeline.

use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};

use crate::chain::erc20;
use crate::chain::ChainClient;
use crate::custody::{RemoteSigner, WalletId};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::broadcast;
use crate::pipeline::builder::TxBuilder;

/// Progression of an allowance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalState {
    /// No allowance information yet.
    Unknown,
    /// Allowance has been read.
    Checked,
    /// Existing allowance covers the required amount; nothing submitted.
    Sufficient,
    /// An approval transaction is in flight.
    InsufficientPendingApproval,
    /// The approval mined and the re-read allowance covers the amount.
    Approved,
    /// The approval mined but the allowance is still short.
    Failed,
}

/// Result of driving the approval state machine to a terminal state.
#[derive(Debug, Clone, Copy)]
pub struct ApprovalOutcome {
    /// Terminal state reached.
    pub state: ApprovalState,
    /// Hash of the approval transaction, when one was submitted.
    pub tx_hash: Option<TxHash>,
}

/// Ensure `spender` may move at least `required` of `token` from `owner`.
///
/// Idempotent: a sufficient existing allowance submits nothing. Otherwise
/// exactly one approval for exactly `required` is signed, broadcast, and
/// confirmed before returning.
#[allow(clippy::too_many_arguments)]
pub async fn ensure_allowance(
    chain: &ChainClient,
    signer: &RemoteSigner,
    wallet: &WalletId,
    owner: Address,
    token: Address,
    spender: Address,
    required: U256,
    receipt_wait: Duration,
) -> PipelineResult<ApprovalOutcome> {
    let current = erc20::allowance(chain, token, owner, spender).await?;

    if current >= required {
        tracing::debug!(%token, %spender, %current, %required, "Allowance sufficient");
        return Ok(ApprovalOutcome { state: ApprovalState::Sufficient, tx_hash: None });
    }

    tracing::info!(
        %token,
        %spender,
        %current,
        %required,
        state = ?ApprovalState::InsufficientPendingApproval,
        "Allowance short, submitting approval"
    );

    let tx = TxBuilder::new(chain).approval(owner, token, spender, required).await?;
    let signed = signer.sign(&tx, wallet).await?;
    let hash = broadcast::broadcast(chain, &signed).await?;

    // Block until the approval is mined; the dependent transaction must not
    // race it through the mempool.
    let receipt = broadcast::confirm(chain, hash, receipt_wait).await?;
    if !receipt.status() {
        return Err(PipelineError::ChainRejection(format!(
            "approval transaction reverted; see {}",
            chain.explorer_tx_url(hash)
        )));
    }

    let after = erc20::allowance(chain, token, owner, spender).await?;
    if after < required {
        tracing::warn!(
            %token,
            %spender,
            %after,
            %required,
            state = ?ApprovalState::Failed,
            "Allowance still short after approval"
        );
        return Err(PipelineError::Validation(
            "approval confirmed but the allowance is still insufficient".to_string(),
        ));
    }

    tracing::info!(%token, %spender, %hash, "Approval confirmed");
    Ok(ApprovalOutcome { state: ApprovalState::Approved, tx_hash: Some(hash) })
}
