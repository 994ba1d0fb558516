mod contracts;
mod notional;
mod tokens;
mod trading_module;
mod tx;
mod vault;

pub use contracts::{
    AuraVaultDeploymentParams, DeploymentParams, MarketParameters, RouterParams, VaultAccount,
    VaultConfig, VaultState,
};
pub use notional::{EnterVaultArgs, NotionalClient};
pub use tokens::{TokenHandle, TokenKind};
pub use trading_module::{TokenPermission, TradingModuleClient};
pub use vault::{FlashLiquidatorClient, ProxyClient, StrategyVaultClient};
