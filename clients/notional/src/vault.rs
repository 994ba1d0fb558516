//! Strategy vault, proxy and liquidator handles.

use alloy::primitives::{Address, I256, U256};
use alloy::providers::DynProvider;
use alloy::rpc::types::TransactionReceipt;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::contracts::{
    IFlashLiquidator, IStrategyVault, IUpgradeable, InitParams, StrategyVaultSettings,
};
use crate::tx::send_and_confirm;

impl From<&utils::StrategyVaultSettings> for StrategyVaultSettings {
    fn from(settings: &utils::StrategyVaultSettings) -> Self {
        StrategyVaultSettings {
            maxUnderlyingSurplus: settings.max_underlying_surplus,
            settlementSlippageLimitPercent: settings.settlement_slippage_limit_percent,
            postMaturitySettlementSlippageLimitPercent: settings
                .post_maturity_settlement_slippage_limit_percent,
            emergencySettlementSlippageLimitPercent: settings
                .emergency_settlement_slippage_limit_percent,
            maxRewardTradeSlippageLimitPercent: settings.max_reward_trade_slippage_limit_percent,
            maxBalancerPoolShare: settings.max_pool_share,
            settlementCoolDownInMinutes: settings.settlement_cool_down_in_minutes,
            oraclePriceDeviationLimitPercent: settings.oracle_price_deviation_limit_percent,
            balancerPoolSlippageLimitPercent: settings.pool_slippage_limit_percent,
        }
    }
}

/// Handle to a strategy vault, either an implementation or a proxy in
/// front of one.
#[derive(Clone)]
pub struct StrategyVaultClient {
    vault: IStrategyVault::IStrategyVaultInstance<Arc<DynProvider>>,
}

impl StrategyVaultClient {
    pub fn new(address: Address, provider: Arc<DynProvider>) -> Self {
        Self {
            vault: IStrategyVault::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.vault.address()
    }

    pub async fn initialize(
        &self,
        from: Address,
        name: &str,
        borrow_currency_id: u16,
        settings: &utils::StrategyVaultSettings,
    ) -> Result<TransactionReceipt> {
        info!(vault = %self.address(), name, borrow_currency_id, "initializing vault");
        let params = InitParams {
            name: name.to_string(),
            borrowCurrencyId: borrow_currency_id,
            settings: settings.into(),
        };
        send_and_confirm(self.vault.initialize(params).from(from), "initialize").await
    }

    pub async fn set_strategy_vault_settings(
        &self,
        from: Address,
        settings: &utils::StrategyVaultSettings,
    ) -> Result<TransactionReceipt> {
        info!(vault = %self.address(), "updating strategy vault settings");
        send_and_confirm(
            self.vault
                .setStrategyVaultSettings(settings.into())
                .from(from),
            "setStrategyVaultSettings",
        )
        .await
    }

    pub async fn convert_strategy_to_underlying(
        &self,
        account: Address,
        strategy_tokens: U256,
        maturity: U256,
    ) -> Result<I256> {
        Ok(self
            .vault
            .convertStrategyToUnderlying(account, strategy_tokens, maturity)
            .call()
            .await?)
    }

    pub async fn name(&self) -> Result<String> {
        Ok(self.vault.name().call().await?)
    }
}

/// Upgradeable proxy, used for the `EmptyProxy` to `TradingModule` swap.
pub struct ProxyClient {
    proxy: IUpgradeable::IUpgradeableInstance<Arc<DynProvider>>,
}

impl ProxyClient {
    pub fn new(address: Address, provider: Arc<DynProvider>) -> Self {
        Self {
            proxy: IUpgradeable::new(address, provider),
        }
    }

    pub async fn upgrade_to(&self, from: Address, implementation: Address) -> Result<TransactionReceipt> {
        info!(proxy = %self.proxy.address(), %implementation, "upgrading proxy");
        send_and_confirm(
            self.proxy.upgradeTo(implementation).from(from),
            "upgradeTo",
        )
        .await
    }

    pub async fn implementation(&self) -> Result<Address> {
        Ok(self.proxy.getImplementation().call().await?)
    }
}

pub struct FlashLiquidatorClient {
    liquidator: IFlashLiquidator::IFlashLiquidatorInstance<Arc<DynProvider>>,
}

impl FlashLiquidatorClient {
    pub fn new(address: Address, provider: Arc<DynProvider>) -> Self {
        Self {
            liquidator: IFlashLiquidator::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.liquidator.address()
    }

    pub async fn enable_currencies(&self, from: Address, currencies: &[u16]) -> Result<TransactionReceipt> {
        info!(liquidator = %self.address(), ?currencies, "enabling liquidator currencies");
        send_and_confirm(
            self.liquidator
                .enableCurrencies(currencies.to_vec())
                .from(from),
            "enableCurrencies",
        )
        .await
    }
}
