//! Fork fixtures: vaults in the state the deposit tests start from, and a
//! helper that enters a vault at a given maturity.

use alloy::primitives::{address, Address, U256};
use alloy::providers::Provider;
use anyhow::{anyhow, bail, Result};
use clients_notional::{EnterVaultArgs, StrategyVaultClient, TokenPermission};
use environment::{Chain, Environment};
use std::future::Future;
use tracing::{info, warn};
use utils::{DepositParams, DexId, TradeType, VaultConfigParams};

use crate::config::{VaultKind, STRAT_STABLE_ETH_STETH};
use crate::environment::BalancerEnvironment;

/// The live ETH/stETH vault proxy on mainnet.
pub const STABLE_ETH_STETH_VAULT: Address = address!("F049B944eC83aBb50020774D48a8cf40790996e6");

/// Vault config the fixtures register, with room for large test positions.
pub const FIXTURE_VAULT_CONFIG: VaultConfigParams =
    VaultConfigParams::positional(3, 1, 100, 900, 0, 102, 80, 2, 1500, [0, 0], 10_000);

/// Borrow capacity paired with [`FIXTURE_VAULT_CONFIG`].
pub const FIXTURE_BORROW_CAPACITY: u64 = 750_000_000_000;

/// Currency id of native ETH.
const ETH: u16 = 1;

pub struct VaultFixture {
    pub vault: StrategyVaultClient,
    /// Proxy in front of the mock implementation
    pub mock: StrategyVaultClient,
}

/// Existing ETH/stETH vault reconfigured for testing, plus a mock-backed
/// proxy allowed to trade the pool's tokens.
pub async fn strat_stable_eth_steth(env: &BalancerEnvironment) -> Result<VaultFixture> {
    let strat = STRAT_STABLE_ETH_STETH;
    let config = env.strat_config(strat)?;
    let base = &env.env;
    let capacity = U256::from(FIXTURE_BORROW_CAPACITY);

    let vault = StrategyVaultClient::new(STABLE_ETH_STETH_VAULT, base.provider.clone());
    vault
        .set_strategy_vault_settings(base.owner, &config.settings)
        .await?;
    base.notional
        .update_vault(base.owner, vault.address(), &FIXTURE_VAULT_CONFIG, capacity)
        .await?;

    let kind = VaultKind::MetaStable2TokenAura;
    let implementation = env
        .deploy_balancer_vault(strat, kind.implementation(), kind.helpers())
        .await?;
    let mock_implementation = env
        .deploy_balancer_vault(strat, kind.mock(), kind.helpers())
        .await?;
    let mock = env
        .deploy_vault_proxy(
            strat,
            implementation.address(),
            Some(mock_implementation.address()),
        )
        .await?;

    let curve_single = TokenPermission::allow(&[DexId::Curve], &[TradeType::ExactInSingle]);
    let both_single = TokenPermission::allow(
        &[DexId::BalancerV2, DexId::Curve],
        &[TradeType::ExactInSingle],
    );
    env.set_token_permissions(
        mock.address(),
        &[
            (base.addresses.token("wstETH")?, both_single),
            (base.addresses.token("stETH")?, curve_single),
            (base.addresses.token("WETH")?, both_single),
            (Address::ZERO, both_single),
        ],
    )
    .await?;
    base.notional
        .update_vault(base.owner, mock.address(), &FIXTURE_VAULT_CONFIG, capacity)
        .await?;

    info!(vault = %vault.address(), mock = %mock.address(), "ETH/stETH fixture ready");
    Ok(VaultFixture { vault, mock })
}

/// Fresh boosted pool vault for `strat` plus a mock-backed proxy. The vault
/// may sell BAL rewards through Uniswap V3 batch trades.
pub async fn strat_boosted_pool(env: &BalancerEnvironment, strat: &str) -> Result<VaultFixture> {
    let config = env.strat_config(strat)?;
    if config.kind != VaultKind::Boosted3TokenAura {
        bail!("{} is not a boosted pool strategy", strat);
    }
    let kind = config.kind;

    let implementation = env
        .deploy_balancer_vault(strat, kind.implementation(), kind.helpers())
        .await?;
    let vault = env
        .deploy_vault_proxy(strat, implementation.address(), None)
        .await?;
    env.set_token_permissions(
        vault.address(),
        &[(
            env.env.addresses.token("BAL")?,
            TokenPermission::allow(&[DexId::UniswapV3], &[TradeType::ExactInBatch]),
        )],
    )
    .await?;

    let mock_implementation = env
        .deploy_balancer_vault(strat, kind.mock(), kind.helpers())
        .await?;
    let mock = env
        .deploy_vault_proxy(
            strat,
            implementation.address(),
            Some(mock_implementation.address()),
        )
        .await?;

    info!(strat, vault = %vault.address(), mock = %mock.address(), "boosted pool fixture ready");
    Ok(VaultFixture { vault, mock })
}

/// One `enterVault` position.
#[derive(Debug, Clone)]
pub struct EnterMaturity {
    pub account: Address,
    pub currency_id: u16,
    /// Index into the currency's active markets, 0 is the nearest
    pub market_index: usize,
    pub deposit_amount: U256,
    /// fCash borrowed, 8 decimals
    pub primary_borrow_amount: U256,
    pub deposit_params: DepositParams,
}

impl EnterMaturity {
    pub fn new(account: Address, currency_id: u16, deposit_amount: U256, primary_borrow_amount: U256) -> Self {
        Self {
            account,
            currency_id,
            market_index: 0,
            deposit_amount,
            primary_borrow_amount,
            deposit_params: DepositParams::default(),
        }
    }

    pub fn at_market(mut self, market_index: usize) -> Self {
        self.market_index = market_index;
        self
    }

    pub fn with_deposit_params(mut self, deposit_params: DepositParams) -> Self {
        self.deposit_params = deposit_params;
        self
    }
}

/// Enters `vault` at the maturity of the chosen active market and returns
/// that maturity. ETH deposits are attached as call value; token deposits
/// must already be approved to Notional.
pub async fn enter_maturity(env: &Environment, vault: Address, args: &EnterMaturity) -> Result<U256> {
    let maturity = env
        .notional
        .active_maturity(args.currency_id, args.market_index)
        .await?;
    let value = if args.currency_id == ETH {
        args.deposit_amount
    } else {
        U256::ZERO
    };
    env.notional
        .enter_vault(&EnterVaultArgs {
            account: args.account,
            vault,
            deposit_amount: args.deposit_amount,
            maturity,
            fcash: args.primary_borrow_amount,
            max_borrow_rate: 0,
            vault_data: args.deposit_params.abi_encode(),
            value,
        })
        .await?;
    Ok(maturity)
}

/// Unlocked accounts the node funds at genesis.
pub async fn dev_accounts(env: &Environment) -> Result<Vec<Address>> {
    Ok(env.provider.get_accounts().await?)
}

/// Takes a snapshot on creation; [`Isolation::restore`] reverts to it.
pub struct Isolation {
    chain: Chain,
    snapshot: U256,
}

impl Isolation {
    pub async fn begin(chain: Chain) -> Result<Self> {
        let snapshot = chain.snapshot().await?;
        Ok(Self { chain, snapshot })
    }

    pub async fn restore(self) -> Result<()> {
        self.chain.revert(self.snapshot).await
    }

    /// Runs `body` on its own task and reverts to the snapshot however it
    /// ends. A panic in `body` is resumed after the revert.
    pub async fn run<F, T>(self, body: F) -> Result<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let outcome = tokio::spawn(body).await;
        let restored = self.restore().await;
        match outcome {
            Ok(value) => restored.map(|_| value),
            Err(e) if e.is_panic() => {
                if let Err(error) = restored {
                    warn!(%error, "fork not reverted after panic");
                }
                std::panic::resume_unwind(e.into_panic())
            }
            Err(e) => {
                restored?;
                Err(anyhow!("isolated task did not complete: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utils::testing::MockNode;

    #[test]
    fn fixture_config_is_enabled_for_eth() {
        assert_eq!(FIXTURE_VAULT_CONFIG.flags, 3);
        assert_eq!(FIXTURE_VAULT_CONFIG.currency_id, 1);
        assert_eq!(FIXTURE_VAULT_CONFIG.min_account_borrow_size, 100);
        assert_eq!(FIXTURE_VAULT_CONFIG.min_collateral_ratio_bps, 900);
        assert_eq!(FIXTURE_VAULT_CONFIG.max_required_account_collateral_ratio_bps, 10_000);
    }

    fn isolated(node: &MockNode) -> Chain {
        node.push(&U256::from(7u64)); // snapshot id
        Chain::new(node.provider())
    }

    #[tokio::test]
    async fn run_reverts_after_success() {
        let node = MockNode::new();
        let chain = isolated(&node);
        node.push(&true);

        let isolation = Isolation::begin(chain).await.unwrap();
        let value = isolation.run(async { 42 }).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(node.methods(), vec!["evm_snapshot", "evm_revert"]);
        assert_eq!(node.calls()[1].params[0], "0x7");
    }

    #[tokio::test]
    async fn run_reverts_before_resuming_a_panic() {
        let node = MockNode::new();
        let chain = isolated(&node);
        node.push(&true);

        let isolation = Isolation::begin(chain).await.unwrap();
        let outcome = tokio::spawn(async move {
            isolation
                .run(async { panic!("assertion failed inside fork test") })
                .await
        })
        .await;
        assert!(outcome.unwrap_err().is_panic());
        assert_eq!(node.methods(), vec!["evm_snapshot", "evm_revert"]);
        assert_eq!(node.remaining(), 0);
    }

    #[tokio::test]
    async fn refused_revert_is_an_error() {
        let node = MockNode::new();
        let chain = isolated(&node);
        node.push(&false);

        let isolation = Isolation::begin(chain).await.unwrap();
        assert!(isolation.run(async {}).await.is_err());
    }

    #[test]
    fn enter_maturity_defaults_to_nearest_market() {
        let args = EnterMaturity::new(Address::ZERO, 1, U256::from(10u64), U256::from(5u64));
        assert_eq!(args.market_index, 0);
        assert!(args.deposit_params.trade.is_none());
        assert_eq!(args.at_market(1).market_index, 1);
    }
}
