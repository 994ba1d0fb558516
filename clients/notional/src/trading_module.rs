//! Trading module client: price oracles and per-vault token permissions.

use alloy::primitives::Address;
use alloy::providers::DynProvider;
use alloy::rpc::types::TransactionReceipt;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utils::{set_dex_flags, set_trade_type_flags, DexId, TradeType};

use crate::contracts::{ITradingModule, TokenPermissions};
use crate::tx::send_and_confirm;

/// Which exchanges and trade shapes a vault may use when selling a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPermission {
    pub allow_sell: bool,
    pub dex_flags: u32,
    pub trade_type_flags: u32,
}

impl TokenPermission {
    /// Sell permission restricted to the given exchanges and trade types.
    pub fn allow(dexes: &[DexId], trade_types: &[TradeType]) -> Self {
        Self {
            allow_sell: true,
            dex_flags: set_dex_flags(0, dexes),
            trade_type_flags: set_trade_type_flags(0, trade_types),
        }
    }
}

impl From<TokenPermission> for TokenPermissions {
    fn from(permission: TokenPermission) -> Self {
        TokenPermissions {
            allowSell: permission.allow_sell,
            dexFlags: permission.dex_flags,
            tradeTypeFlags: permission.trade_type_flags,
        }
    }
}

#[derive(Clone)]
pub struct TradingModuleClient {
    module: ITradingModule::ITradingModuleInstance<Arc<DynProvider>>,
}

impl TradingModuleClient {
    pub fn new(address: Address, provider: Arc<DynProvider>) -> Self {
        Self {
            module: ITradingModule::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.module.address()
    }

    pub async fn set_price_oracle(
        &self,
        from: Address,
        token: Address,
        oracle: Address,
    ) -> Result<TransactionReceipt> {
        info!(%token, %oracle, "setting price oracle");
        send_and_confirm(
            self.module.setPriceOracle(token, oracle).from(from),
            "setPriceOracle",
        )
        .await
    }

    /// Grants `vault` the given permission for selling `token`.
    pub async fn set_token_permissions(
        &self,
        from: Address,
        vault: Address,
        token: Address,
        permission: TokenPermission,
    ) -> Result<TransactionReceipt> {
        info!(
            %vault,
            %token,
            dex_flags = permission.dex_flags,
            trade_type_flags = permission.trade_type_flags,
            "setting token permissions"
        );
        send_and_confirm(
            self.module
                .setTokenPermissions(vault, token, permission.into())
                .from(from),
            "setTokenPermissions",
        )
        .await
    }

    pub async fn token_permissions(&self, vault: Address, token: Address) -> Result<TokenPermission> {
        let result = self.module.tokenWhitelist(vault, token).call().await?;
        Ok(TokenPermission {
            allow_sell: result.allowSell,
            dex_flags: result.dexFlags,
            trade_type_flags: result.tradeTypeFlags,
        })
    }

    pub async fn price_oracle(&self, token: Address) -> Result<Address> {
        Ok(self.module.priceOracles(token).call().await?.oracle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balancer_and_curve_exact_in_single() {
        let permission = TokenPermission::allow(
            &[DexId::BalancerV2, DexId::Curve],
            &[TradeType::ExactInSingle],
        );
        assert!(permission.allow_sell);
        assert_eq!(permission.dex_flags, 0b11_0000);
        assert_eq!(permission.trade_type_flags, 1);

        let abi: TokenPermissions = permission.into();
        assert_eq!(abi.dexFlags, 48);
    }

    #[test]
    fn uniswap_v3_batch() {
        let permission = TokenPermission::allow(&[DexId::UniswapV3], &[TradeType::ExactInBatch]);
        assert_eq!(permission.dex_flags, 4);
        assert_eq!(permission.trade_type_flags, 4);
    }
}
