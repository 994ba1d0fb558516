//! Deposits into the ETH/stETH strategy vault on a mainnet fork.
//!
//! Needs a node forking mainnet with `anvil_*` methods and the compiled
//! contract artifacts named in `deploy.toml`:
//!
//! ```bash
//! anvil --fork-url $MAINNET_RPC_URL
//! DEPLOY_CONFIG=deploy.toml cargo test -p strategy-balancer --features fork-tests -- --ignored
//! ```
//!
//! Tests run one at a time and each reverts the fork when it ends, whether
//! it passes or fails.

#![cfg(feature = "fork-tests")]

mod support;

use alloy::primitives::{Bytes, U256};
use balancer::fixtures::{enter_maturity, EnterMaturity};
use environment::Environment;
use support::*;
use utils::{
    updated_vault_settings, DepositParams, DepositTradeParams, DexId, SettingsOverride, TradeType,
};

const ETH: u16 = 1;

/// Checks one account's position after entering and returns its shares.
async fn assert_single_position(
    env: &Environment,
    fork: &Fork,
    account_index: usize,
    maturity: U256,
    deposit: U256,
    borrow: U256,
    expected_shares: f64,
) -> U256 {
    let vault = &fork.fixture.vault;
    let account = fork.accounts[account_index];
    let state = env
        .notional
        .vault_state(vault.address(), maturity)
        .await
        .unwrap();
    let position = env
        .notional
        .vault_account(account, vault.address())
        .await
        .unwrap();

    assert_eq!(position.fCash, negated(borrow));
    assert_eq!(state.totalfCash, position.fCash);
    assert_approx_u256(position.vaultShares, expected_shares, 1e-5);
    assert_eq!(position.vaultShares, state.totalVaultShares);
    assert_eq!(position.vaultShares, state.totalStrategyTokens);

    let underlying = vault
        .convert_strategy_to_underlying(account, position.vaultShares, maturity)
        .await
        .unwrap();
    assert_approx(
        underlying_value(underlying),
        expected_underlying(deposit, borrow),
        5e-2,
    );
    position.vaultShares
}

#[tokio::test]
#[ignore = "requires a mainnet fork node"]
async fn single_maturity_low_leverage() {
    Fork::run(|fork| async move {
        let env = &fork.env.env;
        let (deposit, borrow) = (ether(10), fcash(5));

        let maturity = enter_maturity(
            env,
            fork.fixture.vault.address(),
            &EnterMaturity::new(fork.accounts[0], ETH, deposit, borrow),
        )
        .await
        .unwrap();
        assert_single_position(env, &fork, 0, maturity, deposit, borrow, 1_491_399_022.0).await;
    })
    .await
    .unwrap();
}

#[tokio::test]
#[ignore = "requires a mainnet fork node"]
async fn single_maturity_high_leverage() {
    Fork::run(|fork| async move {
        let env = &fork.env.env;
        let (deposit, borrow) = (ether(10), fcash(40));

        let maturity = enter_maturity(
            env,
            fork.fixture.vault.address(),
            &EnterMaturity::new(fork.accounts[0], ETH, deposit, borrow),
        )
        .await
        .unwrap();
        assert_single_position(env, &fork, 0, maturity, deposit, borrow, 4_962_562_414.0).await;
    })
    .await
    .unwrap();
}

#[tokio::test]
#[ignore = "requires a mainnet fork node"]
async fn multiple_maturities_low_leverage() {
    Fork::run(|fork| async move {
        let env = &fork.env.env;
        let vault = fork.fixture.vault.address();
        let (deposit, borrow) = (ether(10), fcash(5));

        let first = enter_maturity(
            env,
            vault,
            &EnterMaturity::new(fork.accounts[0], ETH, deposit, borrow),
        )
        .await
        .unwrap();
        let second = enter_maturity(
            env,
            vault,
            &EnterMaturity::new(fork.accounts[1], ETH, deposit, borrow).at_market(1),
        )
        .await
        .unwrap();
        assert_ne!(first, second);

        assert_single_position(env, &fork, 0, first, deposit, borrow, 1_491_399_014.0).await;
        assert_single_position(env, &fork, 1, second, deposit, borrow, 1_489_827_320.0).await;
    })
    .await
    .unwrap();
}

#[tokio::test]
#[ignore = "requires a mainnet fork node"]
async fn multiple_maturities_high_leverage() {
    Fork::run(|fork| async move {
        let env = &fork.env.env;
        let vault = fork.fixture.vault.address();
        let (deposit, borrow) = (ether(10), fcash(40));

        for (account, market) in [(0, 0), (1, 1)] {
            let args = EnterMaturity::new(fork.accounts[account], ETH, deposit, borrow).at_market(market);
            enter_maturity(env, vault, &args).await.unwrap();
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
#[ignore = "requires a mainnet fork node"]
async fn multiple_accounts_in_each_maturity() {
    Fork::run(|fork| async move {
        let env = &fork.env.env;
        let vault = fork.fixture.vault.address();
        let (deposit, borrow) = (ether(10), fcash(40));

        let mut maturities = Vec::new();
        for (account, market) in [(0, 0), (1, 0), (2, 1), (3, 1)] {
            let args = EnterMaturity::new(fork.accounts[account], ETH, deposit, borrow).at_market(market);
            maturities.push(enter_maturity(env, vault, &args).await.unwrap());
        }

        // two accounts share each maturity, so totals cover both positions
        for maturity in [maturities[0], maturities[2]] {
            let state = env.notional.vault_state(vault, maturity).await.unwrap();
            assert_eq!(state.totalfCash, negated(borrow * U256::from(2u64)));
            assert_eq!(state.totalVaultShares, state.totalStrategyTokens);
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
#[ignore = "requires a mainnet fork node"]
async fn secondary_currency_trading() {
    Fork::run(|fork| async move {
        let env = &fork.env.env;
        let (deposit, borrow) = (ether(10), fcash(40));
        let params = DepositParams::with_trade(DepositTradeParams {
            dex: DexId::Curve,
            trade_type: TradeType::ExactInSingle,
            amount: ether(5),
            oracle_slippage_percent: 5_000_000,
            trade_unwrapped: true,
            exchange_data: Bytes::new(),
        });

        let args =
            EnterMaturity::new(fork.accounts[0], ETH, deposit, borrow).with_deposit_params(params);
        enter_maturity(env, fork.fixture.vault.address(), &args)
            .await
            .unwrap();
    })
    .await
    .unwrap();
}

#[tokio::test]
#[ignore = "requires a mainnet fork node"]
async fn leverage_ratio_too_high() {
    Fork::run(|fork| async move {
        let env = &fork.env.env;

        let err = enter_maturity(
            env,
            fork.fixture.vault.address(),
            &EnterMaturity::new(fork.accounts[0], ETH, ether(10), fcash(90)),
        )
        .await
        .unwrap_err();
        assert!(
            format!("{:#}", err).contains("Insufficient Collateral"),
            "unexpected error: {:#}",
            err
        );
    })
    .await
    .unwrap();
}

#[tokio::test]
#[ignore = "requires a mainnet fork node"]
async fn balancer_share_too_high() {
    Fork::run(|fork| async move {
        let env = &fork.env.env;
        let vault = &fork.fixture.vault;

        let config = fork.env.strat_config(balancer::STRAT_STABLE_ETH_STETH).unwrap();
        let settings = updated_vault_settings(
            &config.settings,
            &SettingsOverride {
                max_pool_share: Some(0),
                ..Default::default()
            },
        );
        vault
            .set_strategy_vault_settings(env.owner, &settings)
            .await
            .unwrap();

        let result = enter_maturity(
            env,
            vault.address(),
            &EnterMaturity::new(fork.accounts[0], ETH, ether(10), fcash(5)),
        )
        .await;
        assert!(result.is_err());
    })
    .await
    .unwrap();
}
