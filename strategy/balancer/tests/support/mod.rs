//! Shared setup for the fork tests.

#![allow(dead_code)]

use alloy::primitives::{Address, I256, U256};
use anyhow::Result;
use balancer::fixtures::{self, Isolation, VaultFixture};
use balancer::BalancerEnvironment;
use environment::{Chain, DeployConfig};
use std::future::Future;
use std::path::PathBuf;
use tokio::sync::Mutex;
use utils::u256_to_f64;

/// `DEPLOY_CONFIG`, or `deploy.toml` at the workspace root.
fn config_path() -> PathBuf {
    std::env::var_os("DEPLOY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../deploy.toml")))
}

/// Fork tests share one node, so they take turns.
static FORK_LOCK: Mutex<()> = Mutex::const_new(());

/// A bootstrapped fork with the ETH/stETH fixture deployed.
pub struct Fork {
    pub env: BalancerEnvironment,
    pub fixture: VaultFixture,
    pub accounts: Vec<Address>,
}

impl Fork {
    /// Bootstraps the fixture and hands it to `test`. Everything from setup
    /// on is reverted when `test` returns, when setup fails and when an
    /// assertion inside `test` panics.
    pub async fn run<F, Fut>(test: F) -> Result<()>
    where
        F: FnOnce(Fork) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let _turn = FORK_LOCK.lock().await;
        let config = DeployConfig::load(&config_path())?;
        let isolation = Isolation::begin(Chain::new(config.connect())).await?;
        isolation
            .run(async move {
                let fork = Fork::stable_eth_steth(&config).await?;
                test(fork).await;
                Ok::<_, anyhow::Error>(())
            })
            .await?
    }

    async fn stable_eth_steth(config: &DeployConfig) -> Result<Self> {
        let env = BalancerEnvironment::from_config(config).await?;
        let fixture = fixtures::strat_stable_eth_steth(&env).await?;
        let accounts = fixtures::dev_accounts(&env.env).await?;
        Ok(Self {
            env,
            fixture,
            accounts,
        })
    }
}

pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(18u64))
}

/// fCash amounts carry 8 decimals.
pub fn fcash(amount: u64) -> U256 {
    U256::from(amount) * U256::from(100_000_000u64)
}

pub fn negated(amount: U256) -> I256 {
    -I256::from_raw(amount)
}

/// Relative closeness check, reporting both values on failure.
pub fn assert_approx(actual: f64, expected: f64, rel: f64) {
    let tolerance = expected.abs() * rel;
    assert!(
        (actual - expected).abs() <= tolerance,
        "{} is not within rel {} of {}",
        actual,
        rel,
        expected
    );
}

pub fn assert_approx_u256(actual: U256, expected: f64, rel: f64) {
    assert_approx(u256_to_f64(actual, 0), expected, rel);
}

/// Expected underlying value of a position: deposit plus borrowed fCash
/// scaled from 8 to 18 decimals.
pub fn expected_underlying(deposit: U256, borrow: U256) -> f64 {
    u256_to_f64(deposit, 18) + u256_to_f64(borrow, 8)
}

pub fn underlying_value(value: I256) -> f64 {
    u256_to_f64(value.unsigned_abs(), 18)
}
