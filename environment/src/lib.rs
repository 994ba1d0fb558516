//! Forked-network environment for the vault deployments.

mod chain;
pub mod config;
mod descriptor;
mod environment;

pub use chain::Chain;
pub use config::{ConfigError, DeployConfig, LogFormat, LoggingConfig};
pub use descriptor::{BalancerAddresses, DescriptorError, NetworkDescriptor, NetworkName};
pub use environment::{Environment, ASSET_RATE_ORACLES, BASE_ROUTER, PRICE_ORACLES};
