//! Notional V2 router client.

use alloy::primitives::ruint::UintTryFrom;
use alloy::primitives::{aliases::U80, Address, Bytes, U256};
use alloy::providers::DynProvider;
use alloy::rpc::types::TransactionReceipt;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::info;
use utils::VaultConfigParams;

use crate::contracts::{
    INotional, MarketParameters, VaultAccount, VaultConfig, VaultConfigStorage, VaultState,
};
use crate::tx::send_and_confirm;

impl From<&VaultConfigParams> for VaultConfigStorage {
    fn from(config: &VaultConfigParams) -> Self {
        VaultConfigStorage {
            flags: config.flags,
            borrowCurrencyId: config.currency_id,
            minAccountBorrowSize: config.min_account_borrow_size,
            minCollateralRatioBPS: config.min_collateral_ratio_bps,
            feeRate5BPS: config.fee_rate_5bps,
            liquidationRate: config.liquidation_rate,
            reserveFeeShare: config.reserve_fee_share,
            maxBorrowMarketIndex: config.max_borrow_market_index,
            maxDeleverageCollateralRatioBPS: config.max_deleverage_collateral_ratio_bps,
            secondaryBorrowCurrencies: config.secondary_borrow_currencies,
            maxRequiredAccountCollateralRatioBPS: config.max_required_account_collateral_ratio_bps,
        }
    }
}

/// `updateVault` takes the capacity as a uint80.
fn borrow_capacity(capacity: U256) -> Result<U80> {
    U80::uint_try_from(capacity)
        .map_err(|_| anyhow!("max primary borrow capacity {} does not fit uint80", capacity))
}

/// Arguments of a single `enterVault` call.
#[derive(Debug, Clone)]
pub struct EnterVaultArgs {
    pub account: Address,
    pub vault: Address,
    pub deposit_amount: U256,
    pub maturity: U256,
    pub fcash: U256,
    pub max_borrow_rate: u32,
    pub vault_data: Bytes,
    /// Native value attached to the call (ETH denominated vaults)
    pub value: U256,
}

/// Client for the Notional proxy. All governance calls are sent from the
/// address passed in, which on a fork is the impersonated protocol owner.
#[derive(Clone)]
pub struct NotionalClient {
    notional: INotional::INotionalInstance<Arc<DynProvider>>,
}

impl NotionalClient {
    pub fn new(address: Address, provider: Arc<DynProvider>) -> Self {
        Self {
            notional: INotional::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.notional.address()
    }

    pub fn provider(&self) -> &Arc<DynProvider> {
        self.notional.provider()
    }

    pub async fn owner(&self) -> Result<Address> {
        Ok(self.notional.owner().call().await?)
    }

    /// Points the Notional proxy at a new router implementation.
    pub async fn upgrade_to(&self, from: Address, router: Address) -> Result<TransactionReceipt> {
        info!(%router, "upgrading notional router");
        send_and_confirm(self.notional.upgradeTo(router).from(from), "upgradeTo").await
    }

    pub async fn update_asset_rate(
        &self,
        from: Address,
        currency_id: u16,
        rate_oracle: Address,
    ) -> Result<TransactionReceipt> {
        info!(currency_id, %rate_oracle, "updating asset rate oracle");
        send_and_confirm(
            self.notional
                .updateAssetRate(currency_id, rate_oracle)
                .from(from),
            "updateAssetRate",
        )
        .await
    }

    /// Registers or updates a vault with the protocol.
    pub async fn update_vault(
        &self,
        from: Address,
        vault: Address,
        config: &VaultConfigParams,
        max_primary_borrow_capacity: U256,
    ) -> Result<TransactionReceipt> {
        let capacity = borrow_capacity(max_primary_borrow_capacity)?;
        info!(%vault, currency_id = config.currency_id, %capacity, "updating vault config");
        send_and_confirm(
            self.notional
                .updateVault(vault, config.into(), capacity)
                .from(from),
            "updateVault",
        )
        .await
    }

    pub async fn active_markets(&self, currency_id: u16) -> Result<Vec<MarketParameters>> {
        Ok(self.notional.getActiveMarkets(currency_id).call().await?)
    }

    /// Maturity of the active market at `market_index` for a currency.
    pub async fn active_maturity(&self, currency_id: u16, market_index: usize) -> Result<U256> {
        let markets = self.active_markets(currency_id).await?;
        markets
            .get(market_index)
            .map(|market| market.maturity)
            .ok_or_else(|| {
                anyhow!(
                    "currency {} has {} active markets, index {} requested",
                    currency_id,
                    markets.len(),
                    market_index
                )
            })
    }

    pub async fn vault_config(&self, vault: Address) -> Result<VaultConfig> {
        Ok(self.notional.getVaultConfig(vault).call().await?)
    }

    pub async fn vault_state(&self, vault: Address, maturity: U256) -> Result<VaultState> {
        Ok(self.notional.getVaultState(vault, maturity).call().await?)
    }

    pub async fn vault_account(&self, account: Address, vault: Address) -> Result<VaultAccount> {
        Ok(self.notional.getVaultAccount(account, vault).call().await?)
    }

    /// Enters a vault position, sent from the account itself.
    pub async fn enter_vault(&self, args: &EnterVaultArgs) -> Result<TransactionReceipt> {
        info!(
            account = %args.account,
            vault = %args.vault,
            deposit = %args.deposit_amount,
            fcash = %args.fcash,
            maturity = %args.maturity,
            "entering vault"
        );
        send_and_confirm(
            self.notional
                .enterVault(
                    args.account,
                    args.vault,
                    args.deposit_amount,
                    args.maturity,
                    args.fcash,
                    args.max_borrow_rate,
                    args.vault_data.clone(),
                )
                .from(args.account)
                .value(args.value),
            "enterVault",
        )
        .await
    }
}
