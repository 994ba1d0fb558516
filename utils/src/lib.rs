//! Shared utilities for the vault deployment workspace.
//!
//! Mostly pure argument assembly: flag bitsets, vault configuration
//! records, fixed-point literals and deposit payloads that are handed
//! verbatim to the protocol contracts. [`wait_for_receipt`] is the one
//! helper that talks to a node.

mod deposit;
mod flags;
mod receipt;
mod settings;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod units;
mod vault_config;

pub use deposit::{DepositParams, DepositTradeParams};
pub use flags::{set_dex_flags, set_flags, set_trade_type_flags, DexId, TradeType, VaultFlag};
pub use receipt::wait_for_receipt;
pub use settings::{updated_vault_settings, SettingsOverride, StrategyVaultSettings};
pub use units::{parse_scaled, scaled, u256_to_f64};
pub use vault_config::VaultConfigParams;
