use alloy::primitives::TxHash;
use alloy::providers::Provider;
use alloy::rpc::types::TransactionReceipt;
use anyhow::{bail, Result};
use std::time::Duration;

const RECEIPT_POLLS: u32 = 120;
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Polls `eth_getTransactionReceipt` until the node reports `tx` as mined.
///
/// Fork nodes mine on submission, so the first poll normally succeeds.
pub async fn wait_for_receipt<P: Provider>(provider: &P, tx: TxHash) -> Result<TransactionReceipt> {
    for attempt in 0..RECEIPT_POLLS {
        if let Some(receipt) = provider.get_transaction_receipt(tx).await? {
            return Ok(receipt);
        }
        if attempt + 1 < RECEIPT_POLLS {
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
    bail!("no receipt for tx {} after {} polls", tx, RECEIPT_POLLS)
}
