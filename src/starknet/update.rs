//! Approve-then-update submission protocol.
//!
//! Starknet price updates are paid in an ERC20 fee token. Before the update
//! call the sender must grant the price-feed contract an allowance for the
//! quoted fee, and that approval must be confirmed before the update is sent:
//!
//! ```text
//! NotStarted --approve ok--> FeeApproved --update sent--> UpdateSubmitted --ok--> Confirmed
//!     |                           |                              |
//!     +--approve fails----> Failed{approve}    Failed{update} <--+
//! ```
//!
//! No fee is ever spent on an update that was not sent after a confirmed
//! approval. An approval that succeeded is not rolled back when the update
//! then fails.

use std::sync::Arc;

use alloy::primitives::U256;
use tracing::{info, warn};

use crate::{
    error::{AppError, Result, TxStep},
    starknet::{
        client::ContractClient,
        felt::{felt_to_hex, ByteBuffer, Felt, FeltReader},
        provider::{StarknetProvider, TransactionReceipt},
        token::TokenClient,
    },
    types::TxResult,
};

/// Progress of one update submission.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateState {
    NotStarted,
    FeeApproved { approve_tx: Felt, fee: U256 },
    UpdateSubmitted { approve_tx: Felt, update_tx: Felt },
    Confirmed(TxResult),
    Failed { step: TxStep, reason: String },
}

/// Drives a single update through the approve-then-update sequence.
///
/// Both clients must already be connected to the sender account.
#[derive(Debug)]
pub struct UpdateSubmission {
    contract: ContractClient,
    fee_token: TokenClient,
    provider: Arc<dyn StarknetProvider>,
    state: UpdateState,
}

impl UpdateSubmission {
    pub fn new(
        contract: ContractClient,
        fee_token: TokenClient,
        provider: Arc<dyn StarknetProvider>,
    ) -> Self {
        Self { contract, fee_token, provider, state: UpdateState::NotStarted }
    }

    pub fn state(&self) -> &UpdateState {
        &self.state
    }

    /// Fee the contract charges for `update` in the fee token.
    pub async fn quote_fee(&self, update: &ByteBuffer) -> Result<U256> {
        let mut calldata = update.to_calldata();
        calldata.push(self.fee_token.address());
        let output = self.contract.call("get_update_fee", calldata).await?;
        FeltReader::new(&output).read_u256()
    }

    /// Grant the contract an allowance of `fee` and wait for confirmation.
    pub async fn approve_fee(&mut self, fee: U256) -> Result<Felt> {
        if self.state != UpdateState::NotStarted {
            return Err(AppError::tx_failed(
                TxStep::Approve,
                format!("cannot approve from state {:?}", self.state),
            ));
        }

        let spender = self.contract.address();
        let approve_tx = match self.fee_token.approve(spender, fee).await {
            Ok(hash) => hash,
            Err(e) => return Err(self.fail(TxStep::Approve, e)),
        };
        info!(
            tx_hash = %felt_to_hex(approve_tx),
            token = %felt_to_hex(self.fee_token.address()),
            %fee,
            "Fee approval submitted"
        );

        if let Err(e) = confirm(self.provider.as_ref(), TxStep::Approve, approve_tx).await {
            return Err(self.fail(TxStep::Approve, e));
        }

        info!(tx_hash = %felt_to_hex(approve_tx), "Fee approval confirmed");
        self.state = UpdateState::FeeApproved { approve_tx, fee };
        Ok(approve_tx)
    }

    /// Send the update and wait for confirmation. Requires a confirmed approval.
    pub async fn submit_update(&mut self, update: &ByteBuffer) -> Result<TxResult> {
        let UpdateState::FeeApproved { approve_tx, .. } = self.state else {
            return Err(AppError::tx_failed(
                TxStep::Update,
                format!("fee approval not confirmed (state {:?})", self.state),
            ));
        };

        let update_tx = match self.contract.invoke("update_price_feeds", update.to_calldata()).await
        {
            Ok(hash) => hash,
            Err(e) => return Err(self.fail(TxStep::Update, e)),
        };
        info!(tx_hash = %felt_to_hex(update_tx), "Price update submitted");
        self.state = UpdateState::UpdateSubmitted { approve_tx, update_tx };

        let receipt = match confirm(self.provider.as_ref(), TxStep::Update, update_tx).await {
            Ok(receipt) => receipt,
            Err(e) => return Err(self.fail(TxStep::Update, e)),
        };

        let result = TxResult { id: felt_to_hex(update_tx), info: receipt.raw };
        info!(tx_hash = %result.id, "Price update confirmed");
        self.state = UpdateState::Confirmed(result.clone());
        Ok(result)
    }

    /// Quote, approve, then update.
    pub async fn run(&mut self, vaa: &[u8]) -> Result<TxResult> {
        let update = ByteBuffer::from_bytes(vaa);
        let fee = self.quote_fee(&update).await?;
        self.approve_fee(fee).await?;
        self.submit_update(&update).await
    }

    /// Record the failure and return it as a `TransactionFailed` error.
    fn fail(&mut self, step: TxStep, err: AppError) -> AppError {
        let reason = match err {
            AppError::TransactionFailed { reason, .. } => reason,
            other => other.to_string(),
        };
        if step == TxStep::Update {
            warn!(%reason, "Price update failed after fee approval; allowance remains granted");
        }
        self.state = UpdateState::Failed { step, reason: reason.clone() };
        AppError::tx_failed(step, reason)
    }
}

/// Wait for `tx_hash` and require a successful execution.
pub(crate) async fn confirm(
    provider: &dyn StarknetProvider,
    step: TxStep,
    tx_hash: Felt,
) -> Result<TransactionReceipt> {
    let receipt =
        provider.wait_for_transaction(tx_hash).await.map_err(|e| AppError::tx_failed(step, e))?;
    match receipt.failure() {
        Some(reason) => Err(AppError::tx_failed(step, reason)),
        None => Ok(receipt),
    }
}
