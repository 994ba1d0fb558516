//! Protocol environment bootstrap on a forked network.
//!
//! Brings a fork of the live protocol up to the state the vault strategies
//! expect: the router is upgraded to a build with the vault actions, asset
//! rate oracles are registered, and a fresh trading module is deployed
//! behind a proxy with its price oracles wired.

use alloy::primitives::{address, Address, Bytes, U256};
use alloy::providers::DynProvider;
use alloy::sol_types::SolValue;
use anyhow::{anyhow, Result};
use clients_deployer::{ArtifactStore, Deployer, Libraries};
use clients_notional::{NotionalClient, ProxyClient, RouterParams, TokenHandle, TradingModuleClient};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::chain::Chain;
use crate::config::DeployConfig;
use crate::descriptor::{NetworkDescriptor, NetworkName};

/// Router the proxy is reset to before the vault actions are layered on.
pub const BASE_ROUTER: Address = address!("2C67B0C0493e358cF368073bc0B5fA6F01E981e0");

/// Asset rate oracles per currency id.
pub const ASSET_RATE_ORACLES: [(u16, Address); 4] = [
    (1, address!("8E3D447eBE244db6D28E2303bCa86Ef3033CFAd6")),
    (2, address!("719993E82974f5b5eA0c5ebA25c260CD5AF78E00")),
    (3, address!("612741825ACedC6F88D8709319fe65bCB015C693")),
    (4, address!("39D9590721331B13C8e9A42941a2B961B513E69d")),
];

/// USD price feeds registered on the trading module. `None` is native ETH,
/// registered under the zero address.
pub const PRICE_ORACLES: [(Option<&str>, Address); 9] = [
    (None, address!("5f4ec3df9cbd43714fe2740f5e3616155c5b8419")),
    (Some("WETH"), address!("5f4ec3df9cbd43714fe2740f5e3616155c5b8419")),
    (Some("DAI"), address!("aed0c38402a5d19df6e4c03f4e2dced6e29c1ee9")),
    (Some("USDC"), address!("8fffffd4afb6115b954bd326cbe7b4ba576818f6")),
    (Some("USDT"), address!("3e7d1eab13ad0104d2750b8863b489d65364e32d")),
    (Some("WBTC"), address!("F4030086522a5bEEa4988F8cA5B36dbC97BeE88c")),
    (Some("BAL"), address!("df2917806e30300537aeb49a7663062f4d1f2b5f")),
    (Some("stETH"), address!("cfe54b5cd566ab89272946f602d76ea879cab4a8")),
    (Some("wstETH"), address!("54bd2a9e54532ff28cdb9208578f63788549b127")),
];

pub struct Environment {
    pub network: NetworkName,
    pub addresses: NetworkDescriptor,
    pub provider: Arc<DynProvider>,
    pub chain: Chain,
    pub deployer: Deployer,
    /// Protocol owner, impersonated for every governance call
    pub owner: Address,
    pub notional: NotionalClient,
    pub trading_module: TradingModuleClient,
    pub tokens: BTreeMap<String, TokenHandle>,
    pub whales: BTreeMap<String, Address>,
    pub balancer_vault: Address,
}

impl Environment {
    /// Connects with `config` and runs the full bootstrap.
    pub async fn from_config(config: &DeployConfig) -> Result<Self> {
        let provider = config.connect();
        let addresses = NetworkDescriptor::load(&config.descriptor_dir, config.network)?;
        let store = ArtifactStore::new(config.artifact_dirs.iter().cloned());
        Self::bootstrap(
            provider,
            config.network,
            addresses,
            store,
            config.impersonated_balance()?,
        )
        .await
    }

    pub async fn bootstrap(
        provider: Arc<DynProvider>,
        network: NetworkName,
        addresses: NetworkDescriptor,
        store: ArtifactStore,
        impersonated_balance: Option<U256>,
    ) -> Result<Self> {
        info!(%network, notional = %addresses.notional, "bootstrapping environment");
        let chain = Chain::new(provider.clone());
        let notional = NotionalClient::new(addresses.notional, provider.clone());

        let owner = notional.owner().await?;
        for account in [addresses.deployer, owner] {
            chain.impersonate(account).await?;
            if let Some(balance) = impersonated_balance {
                chain.set_balance(account, balance).await?;
            }
        }

        notional.upgrade_to(owner, BASE_ROUTER).await?;
        for (currency_id, oracle) in ASSET_RATE_ORACLES {
            notional.update_asset_rate(owner, currency_id, oracle).await?;
        }

        let deployer = Deployer::new(provider.clone(), addresses.deployer, store);
        upgrade_router(&notional, &deployer, &addresses, owner).await?;

        let tokens = addresses
            .tokens
            .iter()
            .map(|(symbol, address)| {
                (
                    symbol.clone(),
                    TokenHandle::new(symbol, *address, provider.clone()),
                )
            })
            .collect();

        for whale in addresses.whales.values() {
            chain.impersonate(*whale).await?;
        }
        let whales = addresses.whales.clone();
        let balancer_vault = addresses.balancer.vault;

        let trading_module =
            deploy_trading_module(&provider, &notional, &deployer, &addresses, owner).await?;

        Ok(Self {
            network,
            addresses,
            provider,
            chain,
            deployer,
            owner,
            notional,
            trading_module,
            tokens,
            whales,
            balancer_vault,
        })
    }

    pub fn token(&self, symbol: &str) -> Result<&TokenHandle> {
        self.tokens
            .get(symbol)
            .ok_or_else(|| anyhow!("environment has no token {}", symbol))
    }

    pub fn whale(&self, name: &str) -> Result<Address> {
        Ok(self.addresses.whale(name)?)
    }
}

/// Deploys the action contracts and a router that wires them in, then
/// points the Notional proxy at the new router.
async fn upgrade_router(
    notional: &NotionalClient,
    deployer: &Deployer,
    addresses: &NetworkDescriptor,
    owner: Address,
) -> Result<Address> {
    let settle_assets = Libraries::from([(
        "SettleAssetsExternal".to_string(),
        addresses.lib("SettleAssetsExternal")?,
    )]);
    let trading_action = deployer
        .deploy_linked("TradingAction", &settle_assets, &[])
        .await?;

    let trading = Libraries::from([("TradingAction".to_string(), trading_action)]);
    let vault_account_action = deployer
        .deploy_linked("VaultAccountAction", &trading, &[])
        .await?;
    let vault_action = deployer.deploy_linked("VaultAction", &trading, &[]).await?;

    let params = RouterParams {
        governance: addresses.action("GovernanceAction")?,
        views: addresses.action("Views")?,
        initializeMarket: addresses.action("InitializeMarketsAction")?,
        nTokenActions: addresses.action("nTokenAction")?,
        batchAction: addresses.action("BatchAction")?,
        accountAction: addresses.action("AccountAction")?,
        erc1155: addresses.action("ERC1155Action")?,
        liquidateCurrency: addresses.action("LiquidateCurrencyAction")?,
        liquidatefCash: addresses.action("LiquidatefCashAction")?,
        cETH: addresses.token("cETH")?,
        treasury: addresses.action("TreasuryAction")?,
        calculationViews: addresses.action("CalculationViews")?,
        vaultAccountAction: vault_account_action,
        vaultAction: vault_action,
    };
    let router = deployer
        .deploy_named("Router", &(params,).abi_encode_params())
        .await?;

    notional.upgrade_to(owner, router).await?;
    Ok(router)
}

/// Deploys the trading module behind an `nProxy`, first pointed at an empty
/// implementation so the module can be constructed with its own proxy
/// address, then registers the USD price oracles.
async fn deploy_trading_module(
    provider: &Arc<DynProvider>,
    notional: &NotionalClient,
    deployer: &Deployer,
    addresses: &NetworkDescriptor,
    owner: Address,
) -> Result<TradingModuleClient> {
    let empty_impl = deployer.deploy_named("EmptyProxy", &[]).await?;
    let proxy = deployer
        .deploy_named("nProxy", &(empty_impl, Bytes::new()).abi_encode_params())
        .await?;
    let implementation = deployer
        .deploy_named(
            "TradingModule",
            &(notional.address(), proxy).abi_encode_params(),
        )
        .await?;
    ProxyClient::new(proxy, provider.clone())
        .upgrade_to(deployer.from(), implementation)
        .await?;

    let trading_module = TradingModuleClient::new(proxy, provider.clone());
    for (symbol, oracle) in PRICE_ORACLES {
        let token = match symbol {
            Some(symbol) => addresses.token(symbol)?,
            None => Address::ZERO,
        };
        trading_module.set_price_oracle(owner, token, oracle).await?;
    }
    info!(trading_module = %proxy, "trading module ready");
    Ok(trading_module)
}
