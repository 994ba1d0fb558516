//! Strategy vault settings and the override helper used by fixtures.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Risk settings handed to a strategy vault's `initialize` and
/// `setStrategyVaultSettings` entry points.
///
/// Slippage limits use 1e8 precision (`3e6` is 3%), pool share and oracle
/// deviation are basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyVaultSettings {
    pub max_underlying_surplus: U256,
    pub settlement_slippage_limit_percent: u32,
    pub post_maturity_settlement_slippage_limit_percent: u32,
    pub emergency_settlement_slippage_limit_percent: u32,
    pub max_reward_trade_slippage_limit_percent: u32,
    pub max_pool_share: u16,
    pub settlement_cool_down_in_minutes: u16,
    pub oracle_price_deviation_limit_percent: u16,
    pub pool_slippage_limit_percent: u16,
}

/// Named replacements for individual settings fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverride {
    pub max_underlying_surplus: Option<U256>,
    pub settlement_slippage_limit_percent: Option<u32>,
    pub post_maturity_settlement_slippage_limit_percent: Option<u32>,
    pub emergency_settlement_slippage_limit_percent: Option<u32>,
    pub max_reward_trade_slippage_limit_percent: Option<u32>,
    pub max_pool_share: Option<u16>,
    pub settlement_cool_down_in_minutes: Option<u16>,
    pub oracle_price_deviation_limit_percent: Option<u16>,
    pub pool_slippage_limit_percent: Option<u16>,
}

/// Returns a copy of `settings` with every field set in `update` replaced.
pub fn updated_vault_settings(
    settings: &StrategyVaultSettings,
    update: &SettingsOverride,
) -> StrategyVaultSettings {
    StrategyVaultSettings {
        max_underlying_surplus: update
            .max_underlying_surplus
            .unwrap_or(settings.max_underlying_surplus),
        settlement_slippage_limit_percent: update
            .settlement_slippage_limit_percent
            .unwrap_or(settings.settlement_slippage_limit_percent),
        post_maturity_settlement_slippage_limit_percent: update
            .post_maturity_settlement_slippage_limit_percent
            .unwrap_or(settings.post_maturity_settlement_slippage_limit_percent),
        emergency_settlement_slippage_limit_percent: update
            .emergency_settlement_slippage_limit_percent
            .unwrap_or(settings.emergency_settlement_slippage_limit_percent),
        max_reward_trade_slippage_limit_percent: update
            .max_reward_trade_slippage_limit_percent
            .unwrap_or(settings.max_reward_trade_slippage_limit_percent),
        max_pool_share: update.max_pool_share.unwrap_or(settings.max_pool_share),
        settlement_cool_down_in_minutes: update
            .settlement_cool_down_in_minutes
            .unwrap_or(settings.settlement_cool_down_in_minutes),
        oracle_price_deviation_limit_percent: update
            .oracle_price_deviation_limit_percent
            .unwrap_or(settings.oracle_price_deviation_limit_percent),
        pool_slippage_limit_percent: update
            .pool_slippage_limit_percent
            .unwrap_or(settings.pool_slippage_limit_percent),
    }
}
