use alloy::contract::{CallBuilder, CallDecoder};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionReceipt;
use anyhow::{anyhow, bail, Result};
use tracing::debug;
use utils::wait_for_receipt;

/// Submits a state-changing call and waits for a successful receipt.
///
/// A revert during gas estimation surfaces as an error whose message carries
/// the node's revert text, e.g. `execution reverted: Insufficient Collateral`.
pub(crate) async fn send_and_confirm<P, D>(
    call: CallBuilder<P, D>,
    label: &str,
) -> Result<TransactionReceipt>
where
    P: Provider,
    D: CallDecoder,
{
    let pending = call
        .send()
        .await
        .map_err(|e| anyhow!("{} failed: {}", label, e))?;
    let receipt = wait_for_receipt(pending.provider(), *pending.tx_hash())
        .await
        .map_err(|e| anyhow!("{} receipt: {}", label, e))?;
    if !receipt.status() {
        bail!("{} reverted in tx {}", label, receipt.transaction_hash);
    }
    debug!(
        call = label,
        tx = %receipt.transaction_hash,
        gas_used = receipt.gas_used,
        "transaction confirmed"
    );
    Ok(receipt)
}
