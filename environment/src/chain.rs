//! Fork-node control: impersonation, funding, snapshots and time travel.

use alloy::primitives::{Address, U256};
use alloy::providers::ext::AnvilApi;
use alloy::providers::{DynProvider, Provider};
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct Chain {
    provider: Arc<DynProvider>,
}

impl Chain {
    pub fn new(provider: Arc<DynProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<DynProvider> {
        &self.provider
    }

    /// Lets the node sign transactions sent `from` this address.
    pub async fn impersonate(&self, account: Address) -> Result<()> {
        debug!(%account, "impersonating account");
        self.provider.anvil_impersonate_account(account).await?;
        Ok(())
    }

    pub async fn set_balance(&self, account: Address, wei: U256) -> Result<()> {
        debug!(%account, %wei, "setting balance");
        self.provider.anvil_set_balance(account, wei).await?;
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<U256> {
        Ok(self.provider.anvil_snapshot().await?)
    }

    /// Restores the chain to `snapshot`. Snapshots are single use.
    pub async fn revert(&self, snapshot: U256) -> Result<()> {
        if !self.provider.anvil_revert(snapshot).await? {
            bail!("node refused to revert to snapshot {}", snapshot);
        }
        Ok(())
    }

    /// Advances block time by `seconds` and mines a block so the new
    /// timestamp is visible to calls.
    pub async fn sleep(&self, seconds: u64) -> Result<()> {
        let offset = self.provider.anvil_increase_time(seconds).await?;
        debug!(seconds, offset, "advanced block time");
        self.mine(1).await
    }

    pub async fn mine(&self, blocks: u64) -> Result<()> {
        self.provider.anvil_mine(Some(blocks), None).await?;
        Ok(())
    }

    pub async fn block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utils::testing::MockNode;

    #[tokio::test]
    async fn sleep_advances_time_then_mines() {
        let node = MockNode::new();
        node.push(&3600);
        node.push_null();
        node.push(&"0x10");

        let chain = Chain::new(node.provider());
        chain.sleep(3600).await.unwrap();
        assert_eq!(chain.block_number().await.unwrap(), 16);

        let calls = node.calls();
        let methods: Vec<&str> = calls.iter().map(|call| call.method.as_str()).collect();
        assert_eq!(methods, vec!["evm_increaseTime", "anvil_mine", "eth_blockNumber"]);
        assert_eq!(calls[0].params[0], "0xe10");
        assert_eq!(calls[1].params[0], "0x1");
    }

    #[tokio::test]
    async fn refused_revert_is_an_error() {
        let node = MockNode::new();
        node.push(&"0x1");
        node.push(&false);

        let chain = Chain::new(node.provider());
        let snapshot = chain.snapshot().await.unwrap();
        assert_eq!(snapshot, U256::from(1u64));
        assert!(chain.revert(snapshot).await.is_err());
    }
}
