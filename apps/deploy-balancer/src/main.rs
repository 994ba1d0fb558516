//! Deploys the Balancer vault implementations onto a forked network.
//!
//! Usage: deploy-balancer --config deploy.toml [--network mainnet-fork] [--strategy NAME]... [--proxy]
//!
//! Without `--strategy` every strategy in the table is deployed. Addresses
//! are printed to stdout as JSON; logs go to stderr.

use alloy::primitives::{Address, U256};
use anyhow::Result;
use balancer::{BalancerEnvironment, StrategyConfig, STRATEGIES};
use clap::Parser;
use environment::{DeployConfig, NetworkName};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "deploy-balancer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "deploy.toml")]
    config: PathBuf,

    /// Override the configured network (mainnet, mainnet-fork, hardhat-fork, goerli)
    #[arg(long)]
    network: Option<NetworkName>,

    /// Strategy to deploy; repeat for several
    #[arg(long = "strategy", value_name = "NAME")]
    strategies: Vec<String>,

    /// Also put each implementation behind an initialized proxy
    #[arg(long)]
    proxy: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployedVault {
    implementation: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy: Option<Address>,
    config: StrategyConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    network: NetworkName,
    /// Fork block once the environment was bootstrapped
    block: u64,
    notional: Address,
    trading_module: Address,
    liquidator: Address,
    maturity: U256,
    vaults: BTreeMap<String, DeployedVault>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = DeployConfig::load(&cli.config)?;
    if let Some(network) = cli.network {
        config.network = network;
    }
    config.logging.init()?;

    let strategies: Vec<String> = if cli.strategies.is_empty() {
        STRATEGIES.iter().map(|name| name.to_string()).collect()
    } else {
        cli.strategies.clone()
    };
    // fail on a bad name before touching the chain
    for name in &strategies {
        balancer::strategy_config(name)?;
    }

    let env = BalancerEnvironment::from_config(&config).await?;
    let block = env.env.chain.block_number().await?;
    info!(block, network = %env.env.network, "environment ready");
    let maturity = env.env.notional.active_maturity(1, 0).await?;
    info!(%maturity, "first ETH maturity");

    let mut vaults = BTreeMap::new();
    for name in &strategies {
        let strat_config = env.strat_config(name)?;
        let kind = strat_config.kind;
        let implementation = env
            .deploy_balancer_vault(name, kind.implementation(), kind.helpers())
            .await?;
        let proxy = if cli.proxy {
            Some(
                env.deploy_vault_proxy(name, implementation.address(), None)
                    .await?
                    .address(),
            )
        } else {
            None
        };
        vaults.insert(
            name.clone(),
            DeployedVault {
                implementation: implementation.address(),
                proxy,
                config: strat_config,
            },
        );
    }

    let report = Report {
        network: env.env.network,
        block,
        notional: env.env.notional.address(),
        trading_module: env.env.trading_module.address(),
        liquidator: env.liquidator.address(),
        maturity,
        vaults,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_strategies() {
        let cli = Cli::parse_from([
            "deploy-balancer",
            "--network",
            "hardhat-fork",
            "--strategy",
            "StratBoostedPoolDAIPrimary",
            "--strategy",
            "StratBoostedPoolUSDCPrimary",
        ]);
        assert_eq!(cli.config, PathBuf::from("deploy.toml"));
        assert_eq!(cli.network, Some(NetworkName::Mainnet));
        assert_eq!(cli.strategies.len(), 2);
        assert!(!cli.proxy);
    }
}
