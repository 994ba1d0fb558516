//! Balancer vault deployment on top of a bootstrapped [`Environment`].

use alloy::primitives::{address, Address, Bytes};
use alloy::sol_types::SolValue;
use anyhow::Result;
use clients_notional::{
    AuraVaultDeploymentParams, DeploymentParams, FlashLiquidatorClient, StrategyVaultClient,
    TokenPermission,
};
use environment::{DeployConfig, Environment};
use tracing::info;

use crate::config::{strategy_config, StrategyConfig};

/// Euler flash loan contract handed to the liquidator.
pub const EULER: Address = address!("27182842E098f60e3D576794A5bFFb0777E025d3");
pub const EULER_MARKETS: Address = address!("3520d5a913427E6F0D6A83E07ccD4A4da316e4d3");
/// Currencies the liquidator can flash borrow.
pub const LIQUIDATOR_CURRENCIES: [u16; 3] = [1, 2, 3];

pub struct BalancerEnvironment {
    pub env: Environment,
    pub liquidator: FlashLiquidatorClient,
}

impl BalancerEnvironment {
    pub async fn from_config(config: &DeployConfig) -> Result<Self> {
        let env = Environment::from_config(config).await?;
        Self::new(env).await
    }

    /// Deploys the flash liquidator on top of `env`.
    pub async fn new(env: Environment) -> Result<Self> {
        let liquidator = deploy_liquidator(&env).await?;
        Ok(Self { env, liquidator })
    }

    pub fn strat_config(&self, strat: &str) -> Result<StrategyConfig> {
        strategy_config(strat)
    }

    /// Deploys `contract` for `strat`, linking the helper libraries in `libs`
    /// first. Returns the implementation, which is not initialized.
    pub async fn deploy_balancer_vault(
        &self,
        strat: &str,
        contract: &str,
        libs: &[&str],
    ) -> Result<StrategyVaultClient> {
        let config = self.strat_config(strat)?;
        for lib in libs {
            self.env.deployer.deploy_library(lib).await?;
        }

        let params = AuraVaultDeploymentParams {
            rewardPool: config.aura_reward_pool,
            baseParams: DeploymentParams {
                primaryBorrowCurrencyId: config.primary_currency,
                balancerPoolId: config.pool_id,
                liquidityGauge: config.liquidity_gauge,
                tradingModule: self.env.trading_module.address(),
                settlementPeriodInSeconds: config.settlement_window,
            },
        };
        let implementation = self
            .env
            .deployer
            .deploy_named(
                contract,
                &(self.env.notional.address(), params).abi_encode_params(),
            )
            .await?;
        info!(strat, contract, %implementation, "vault implementation deployed");
        Ok(StrategyVaultClient::new(
            implementation,
            self.env.provider.clone(),
        ))
    }

    /// Initializes `vault` with the strategy settings and registers it with
    /// Notional at the strategy's borrow capacity.
    pub async fn initialize_balancer_vault(
        &self,
        vault: &StrategyVaultClient,
        strat: &str,
    ) -> Result<()> {
        let config = self.strat_config(strat)?;
        vault
            .initialize(
                self.env.owner,
                &config.name,
                config.primary_currency,
                &config.settings,
            )
            .await?;
        self.env
            .notional
            .update_vault(
                self.env.owner,
                vault.address(),
                &config.vault_config,
                config.max_primary_borrow_capacity,
            )
            .await?;
        Ok(())
    }

    /// Puts `implementation` behind a fresh proxy and initializes it. With
    /// `mock_implementation` the proxy is an `nMockProxy` that forwards the
    /// mock-only selectors there.
    pub async fn deploy_vault_proxy(
        &self,
        strat: &str,
        implementation: Address,
        mock_implementation: Option<Address>,
    ) -> Result<StrategyVaultClient> {
        let deployer = &self.env.deployer;
        let proxy = match mock_implementation {
            Some(mock) => {
                deployer
                    .deploy_named(
                        "nMockProxy",
                        &(implementation, Bytes::new(), mock).abi_encode_params(),
                    )
                    .await?
            }
            None => {
                deployer
                    .deploy_named("nProxy", &(implementation, Bytes::new()).abi_encode_params())
                    .await?
            }
        };
        info!(strat, %proxy, %implementation, mock = mock_implementation.is_some(), "vault proxy deployed");

        let vault = StrategyVaultClient::new(proxy, self.env.provider.clone());
        self.initialize_balancer_vault(&vault, strat).await?;
        Ok(vault)
    }

    /// Grants `vault` permission to trade each listed token.
    pub async fn set_token_permissions(
        &self,
        vault: Address,
        permissions: &[(Address, TokenPermission)],
    ) -> Result<()> {
        for (token, permission) in permissions {
            self.env
                .trading_module
                .set_token_permissions(self.env.owner, vault, *token, *permission)
                .await?;
        }
        Ok(())
    }
}

async fn deploy_liquidator(env: &Environment) -> Result<FlashLiquidatorClient> {
    let address = env
        .deployer
        .deploy_named(
            "FlashLiquidator",
            &(env.notional.address(), EULER, EULER_MARKETS).abi_encode_params(),
        )
        .await?;
    let liquidator = FlashLiquidatorClient::new(address, env.provider.clone());
    liquidator
        .enable_currencies(env.deployer.from(), &LIQUIDATOR_CURRENCIES)
        .await?;
    info!(liquidator = %address, "flash liquidator ready");
    Ok(liquidator)
}
