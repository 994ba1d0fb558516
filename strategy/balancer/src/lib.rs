//! Balancer/Aura leveraged vault strategies: the per-strategy parameter
//! table, deployment of vault implementations and proxies, and fork
//! fixtures for exercising deposits.

pub mod config;
mod environment;
pub mod fixtures;

pub use config::{
    strategy_config, StrategyConfig, VaultKind, STRATEGIES, STRAT_BOOSTED_POOL_DAI_PRIMARY,
    STRAT_BOOSTED_POOL_USDC_PRIMARY, STRAT_STABLE_ETH_STETH,
};
pub use environment::{BalancerEnvironment, EULER, EULER_MARKETS, LIQUIDATOR_CURRENCIES};
