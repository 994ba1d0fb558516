//! Balancer/Aura strategy parameters.

use alloy::primitives::{address, b256, Address, B256, U256};
use anyhow::{bail, Result};
use serde::Serialize;
use utils::{scaled, set_flags, StrategyVaultSettings, VaultConfigParams, VaultFlag};

pub const STRAT_STABLE_ETH_STETH: &str = "StratStableETHstETH";
pub const STRAT_BOOSTED_POOL_DAI_PRIMARY: &str = "StratBoostedPoolDAIPrimary";
pub const STRAT_BOOSTED_POOL_USDC_PRIMARY: &str = "StratBoostedPoolUSDCPrimary";

/// Every strategy in the table, in deployment order.
pub const STRATEGIES: [&str; 3] = [
    STRAT_STABLE_ETH_STETH,
    STRAT_BOOSTED_POOL_DAI_PRIMARY,
    STRAT_BOOSTED_POOL_USDC_PRIMARY,
];

const FEE_RECEIVER: Address = address!("0190702d5e52e0269c9319144d3ad62a60ebe526");

/// Vault contract family a strategy is deployed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VaultKind {
    MetaStable2TokenAura,
    Boosted3TokenAura,
}

impl VaultKind {
    pub fn implementation(&self) -> &'static str {
        match self {
            VaultKind::MetaStable2TokenAura => "MetaStable2TokenAuraVault",
            VaultKind::Boosted3TokenAura => "Boosted3TokenAuraVault",
        }
    }

    /// Implementation with the extra hooks used by liquidation tests.
    pub fn mock(&self) -> &'static str {
        match self {
            VaultKind::MetaStable2TokenAura => "MockMetaStable2TokenAuraVault",
            VaultKind::Boosted3TokenAura => "MockBoosted3TokenAuraVault",
        }
    }

    /// External libraries the implementation links against.
    pub fn helpers(&self) -> &'static [&'static str] {
        match self {
            VaultKind::MetaStable2TokenAura => &["MetaStable2TokenAuraHelper"],
            VaultKind::Boosted3TokenAura => &["Boosted3TokenAuraHelper"],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    pub kind: VaultKind,
    pub vault_config: VaultConfigParams,
    pub secondary_borrow_currency: Option<u16>,
    /// Borrow capacity in 8-decimal internal precision
    pub max_primary_borrow_capacity: U256,
    pub name: String,
    pub primary_currency: u16,
    pub pool_id: B256,
    pub liquidity_gauge: Address,
    pub aura_reward_pool: Address,
    pub fee_receiver: Address,
    pub oracle_window_in_seconds: Option<u32>,
    /// Settlement window in seconds
    pub settlement_window: u32,
    pub settings: StrategyVaultSettings,
}

/// Looks up a strategy by name.
pub fn strategy_config(name: &str) -> Result<StrategyConfig> {
    let enabled = set_flags(0, &[VaultFlag::Enabled, VaultFlag::AllowRollPosition]);
    let config = match name {
        STRAT_STABLE_ETH_STETH => StrategyConfig {
            kind: VaultKind::MetaStable2TokenAura,
            vault_config: VaultConfigParams::default()
                .with_flags(enabled)
                .with_currency_id(1)
                .with_min_account_borrow_size(1)
                .with_max_borrow_market_index(2)
                .with_secondary_borrow_currencies([0, 0]),
            secondary_borrow_currency: None,
            max_primary_borrow_capacity: scaled(100_000_000, 8)?,
            name: "Balancer Stable ETH-stETH Strategy".to_string(),
            primary_currency: 1,
            pool_id: b256!("32296969ef14eb0c6d29669c550d4a0449130230000200000000000000000080"),
            liquidity_gauge: address!("cd4722b7c24c29e0413bdcd9e51404b4539d14ae"),
            aura_reward_pool: address!("e4683fe8f53da14ca5dac4251eadfb3aa614d528"),
            fee_receiver: FEE_RECEIVER,
            oracle_window_in_seconds: None,
            settlement_window: 172_800,
            settings: StrategyVaultSettings {
                max_underlying_surplus: scaled(2000, 18)?,
                settlement_slippage_limit_percent: 3_000_000,
                post_maturity_settlement_slippage_limit_percent: 5_000_000,
                emergency_settlement_slippage_limit_percent: 4_000_000,
                max_reward_trade_slippage_limit_percent: 2_000_000,
                max_pool_share: 1_500,
                settlement_cool_down_in_minutes: 20,
                oracle_price_deviation_limit_percent: 200,
                pool_slippage_limit_percent: 9975,
            },
        },
        STRAT_BOOSTED_POOL_DAI_PRIMARY => boosted_pool(
            "Balancer Boosted Pool Strategy",
            enabled,
            2,
            scaled(10_000, 18)?,
            None,
        )?,
        STRAT_BOOSTED_POOL_USDC_PRIMARY => boosted_pool(
            "Balancer Boosted Pool Strategy",
            enabled,
            3,
            scaled(10_000, 6)?,
            Some(0),
        )?,
        other => bail!("unknown balancer strategy: {}", other),
    };
    Ok(config)
}

/// The DAI and USDC strategies share the bb-a-USD pool and its limits.
fn boosted_pool(
    name: &str,
    flags: u16,
    currency_id: u16,
    max_underlying_surplus: U256,
    oracle_window_in_seconds: Option<u32>,
) -> Result<StrategyConfig> {
    Ok(StrategyConfig {
        kind: VaultKind::Boosted3TokenAura,
        vault_config: VaultConfigParams::default()
            .with_flags(flags)
            .with_currency_id(currency_id)
            .with_min_account_borrow_size(1)
            .with_max_borrow_market_index(3)
            .with_secondary_borrow_currencies([0, 0]),
        secondary_borrow_currency: None,
        max_primary_borrow_capacity: scaled(100_000_000, 8)?,
        name: name.to_string(),
        primary_currency: currency_id,
        pool_id: b256!("7b50775383d3d6f0215a8f290f2c9e2eebbeceb20000000000000000000000fe"),
        liquidity_gauge: address!("68d019f64a7aa97e2d4e7363aee42251d08124fb"),
        aura_reward_pool: address!("cc2f52b57247f2bc58fec182b9a60dac5963d010"),
        fee_receiver: FEE_RECEIVER,
        oracle_window_in_seconds,
        settlement_window: 3600 * 24 * 7,
        settings: StrategyVaultSettings {
            max_underlying_surplus,
            settlement_slippage_limit_percent: 5_000_000,
            post_maturity_settlement_slippage_limit_percent: 10_000_000,
            emergency_settlement_slippage_limit_percent: 10_000_000,
            max_reward_trade_slippage_limit_percent: 5_000_000,
            max_pool_share: 2_000,
            settlement_cool_down_in_minutes: 60 * 6,
            oracle_price_deviation_limit_percent: 50,
            pool_slippage_limit_percent: 9900,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_strategy_resolves() {
        for name in STRATEGIES {
            let config = strategy_config(name).unwrap();
            assert_eq!(config.vault_config.currency_id, config.primary_currency);
            assert_eq!(config.vault_config.flags, 3);
            assert_eq!(config.vault_config.min_account_borrow_size, 1);
            assert_eq!(
                config.max_primary_borrow_capacity,
                U256::from(10_000_000_000_000_000u64)
            );
        }
        assert!(strategy_config("StratCurveStableETHstETH").is_err());
    }

    #[test]
    fn stable_eth_steth_limits() {
        let config = strategy_config(STRAT_STABLE_ETH_STETH).unwrap();
        assert_eq!(config.kind, VaultKind::MetaStable2TokenAura);
        assert_eq!(config.vault_config.max_borrow_market_index, 2);
        assert_eq!(config.settings.max_pool_share, 1500);
        assert_eq!(config.settings.settlement_slippage_limit_percent, 3_000_000);
        assert_eq!(config.settings.pool_slippage_limit_percent, 9975);
        assert_eq!(config.settlement_window, 172_800);
        assert_eq!(
            config.settings.max_underlying_surplus,
            U256::from(2000u64) * U256::from(10u64).pow(U256::from(18u64))
        );
    }

    #[test]
    fn boosted_pools_differ_only_in_currency_and_surplus() {
        let dai = strategy_config(STRAT_BOOSTED_POOL_DAI_PRIMARY).unwrap();
        let usdc = strategy_config(STRAT_BOOSTED_POOL_USDC_PRIMARY).unwrap();
        assert_eq!(dai.pool_id, usdc.pool_id);
        assert_eq!(dai.aura_reward_pool, usdc.aura_reward_pool);
        assert_eq!(dai.primary_currency, 2);
        assert_eq!(usdc.primary_currency, 3);
        assert_eq!(usdc.settings.max_underlying_surplus, U256::from(10_000_000_000u64));
        assert_eq!(usdc.oracle_window_in_seconds, Some(0));
        assert_eq!(dai.oracle_window_in_seconds, None);
        assert_eq!(dai.settlement_window, 604_800);
        assert_eq!(dai.settings.settlement_cool_down_in_minutes, 360);
        assert_eq!(dai.kind.helpers(), &["Boosted3TokenAuraHelper"]);
    }

    #[test]
    fn serializes_for_reporting() {
        let config = strategy_config(STRAT_STABLE_ETH_STETH).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["name"], "Balancer Stable ETH-stETH Strategy");
        assert_eq!(json["primaryCurrency"], 1);
        assert_eq!(json["kind"], "MetaStable2TokenAura");
    }
}
