//! Governance instruction submission.

use std::sync::Arc;

use tracing::info;

use crate::{
    error::{AppError, Result, TxStep},
    starknet::{
        client::ContractClient,
        felt::{felt_to_hex, ByteBuffer},
        provider::StarknetProvider,
        update::confirm,
    },
    types::TxResult,
};

/// Send `vaa` to `execute_governance_instruction` and wait for confirmation.
///
/// `contract` must already be connected to the sender account. Submission
/// and confirmation failures are reported at the governance step.
pub async fn submit_governance_instruction(
    contract: &ContractClient,
    provider: Arc<dyn StarknetProvider>,
    vaa: &[u8],
) -> Result<TxResult> {
    let instruction = ByteBuffer::from_bytes(vaa);
    let tx_hash = contract
        .invoke("execute_governance_instruction", instruction.to_calldata())
        .await
        .map_err(|e| AppError::tx_failed(TxStep::Governance, e))?;
    info!(tx_hash = %felt_to_hex(tx_hash), "Governance instruction submitted");

    let receipt = confirm(provider.as_ref(), TxStep::Governance, tx_hash).await?;
    info!(tx_hash = %felt_to_hex(tx_hash), "Governance instruction confirmed");

    Ok(TxResult { id: felt_to_hex(tx_hash), info: receipt.raw })
}
