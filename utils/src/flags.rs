//! Bitset helpers for vault flags and trading permissions.

use serde::{Deserialize, Serialize};

/// Vault configuration flags, one bit each in `VaultConfigStorage.flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VaultFlag {
    Enabled,
    AllowRollPosition,
    OnlyVaultEntry,
    OnlyVaultExit,
    OnlyVaultRoll,
    OnlyVaultDeleverage,
    OnlyVaultSettle,
    AllowReentrancy,
}

impl VaultFlag {
    /// Bit position of the flag.
    pub const fn bit(self) -> u16 {
        match self {
            VaultFlag::Enabled => 0,
            VaultFlag::AllowRollPosition => 1,
            VaultFlag::OnlyVaultEntry => 2,
            VaultFlag::OnlyVaultExit => 3,
            VaultFlag::OnlyVaultRoll => 4,
            VaultFlag::OnlyVaultDeleverage => 5,
            VaultFlag::OnlyVaultSettle => 6,
            VaultFlag::AllowReentrancy => 7,
        }
    }
}

/// Exchanges the trading module can route through. Id 0 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DexId {
    UniswapV2,
    UniswapV3,
    ZeroEx,
    BalancerV2,
    Curve,
    NotionalVault,
}

impl DexId {
    /// On-chain identifier of the exchange.
    pub const fn id(self) -> u16 {
        match self {
            DexId::UniswapV2 => 1,
            DexId::UniswapV3 => 2,
            DexId::ZeroEx => 3,
            DexId::BalancerV2 => 4,
            DexId::Curve => 5,
            DexId::NotionalVault => 6,
        }
    }
}

/// Trade shapes accepted by the trading module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    ExactInSingle,
    ExactOutSingle,
    ExactInBatch,
    ExactOutBatch,
}

impl TradeType {
    /// On-chain identifier of the trade type.
    pub const fn id(self) -> u8 {
        match self {
            TradeType::ExactInSingle => 0,
            TradeType::ExactOutSingle => 1,
            TradeType::ExactInBatch => 2,
            TradeType::ExactOutBatch => 3,
        }
    }
}

/// ORs the given vault flags into `base`.
pub fn set_flags(base: u16, flags: &[VaultFlag]) -> u16 {
    flags.iter().fold(base, |acc, flag| acc | (1 << flag.bit()))
}

/// ORs the given exchanges into a trading permission bitset.
pub fn set_dex_flags(base: u32, dexes: &[DexId]) -> u32 {
    dexes.iter().fold(base, |acc, dex| acc | (1 << dex.id()))
}

/// ORs the given trade types into a trading permission bitset.
pub fn set_trade_type_flags(base: u32, trade_types: &[TradeType]) -> u32 {
    trade_types
        .iter()
        .fold(base, |acc, trade_type| acc | (1 << trade_type.id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_with_roll_is_three() {
        let flags = set_flags(0, &[VaultFlag::Enabled, VaultFlag::AllowRollPosition]);
        assert_eq!(flags, 3);
    }

    #[test]
    fn flags_are_idempotent_and_keep_base() {
        let once = set_flags(0b1000_0000, &[VaultFlag::Enabled]);
        let twice = set_flags(once, &[VaultFlag::Enabled, VaultFlag::Enabled]);
        assert_eq!(once, twice);
        assert_eq!(once, 0b1000_0001);
    }

    #[test]
    fn dex_flags_use_exchange_ids() {
        assert_eq!(set_dex_flags(0, &[DexId::UniswapV3]), 1 << 2);
        assert_eq!(
            set_dex_flags(0, &[DexId::BalancerV2, DexId::Curve]),
            (1 << 4) | (1 << 5)
        );
        assert_eq!(
            set_dex_flags(0, &[DexId::Curve, DexId::BalancerV2]),
            set_dex_flags(0, &[DexId::BalancerV2, DexId::Curve])
        );
    }

    #[test]
    fn trade_type_flags() {
        assert_eq!(set_trade_type_flags(0, &[TradeType::ExactInSingle]), 1);
        assert_eq!(set_trade_type_flags(0, &[TradeType::ExactInBatch]), 4);
        assert_eq!(set_trade_type_flags(0, &[]), 0);
    }

    #[test]
    fn flag_names_deserialize_from_screaming_case() {
        let dex: DexId = serde_json::from_str("\"BALANCER_V2\"").unwrap();
        assert_eq!(dex, DexId::BalancerV2);
        let flag: VaultFlag = serde_json::from_str("\"ALLOW_ROLL_POSITION\"").unwrap();
        assert_eq!(flag, VaultFlag::AllowRollPosition);
    }
}
