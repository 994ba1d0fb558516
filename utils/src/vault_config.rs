//! Vault configuration records passed to `updateVault`.

use serde::{Deserialize, Serialize};

/// Eleven-field vault configuration in protocol storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultConfigParams {
    pub flags: u16,
    pub currency_id: u16,
    pub min_account_borrow_size: u32,
    pub min_collateral_ratio_bps: u16,
    /// Fee rate in units of 5 basis points
    pub fee_rate_5bps: u8,
    pub liquidation_rate: u8,
    pub reserve_fee_share: u8,
    pub max_borrow_market_index: u8,
    pub max_deleverage_collateral_ratio_bps: u16,
    pub secondary_borrow_currencies: [u16; 2],
    pub max_required_account_collateral_ratio_bps: u16,
}

impl Default for VaultConfigParams {
    fn default() -> Self {
        Self {
            flags: 0,
            currency_id: 1,
            min_account_borrow_size: 100_000,
            min_collateral_ratio_bps: 2000,
            fee_rate_5bps: 20,
            liquidation_rate: 104,
            reserve_fee_share: 20,
            max_borrow_market_index: 2,
            max_deleverage_collateral_ratio_bps: 4000,
            secondary_borrow_currencies: [0, 0],
            max_required_account_collateral_ratio_bps: 20_000,
        }
    }
}

impl VaultConfigParams {
    /// Builds a config from its positional form, as written in fixtures:
    /// `[flags, currency, minBorrow, minCR, fee, liqRate, reserveShare,
    /// maxMarket, maxDeleverageCR, [secondary0, secondary1], maxRequiredCR]`.
    #[allow(clippy::too_many_arguments)]
    pub const fn positional(
        flags: u16,
        currency_id: u16,
        min_account_borrow_size: u32,
        min_collateral_ratio_bps: u16,
        fee_rate_5bps: u8,
        liquidation_rate: u8,
        reserve_fee_share: u8,
        max_borrow_market_index: u8,
        max_deleverage_collateral_ratio_bps: u16,
        secondary_borrow_currencies: [u16; 2],
        max_required_account_collateral_ratio_bps: u16,
    ) -> Self {
        Self {
            flags,
            currency_id,
            min_account_borrow_size,
            min_collateral_ratio_bps,
            fee_rate_5bps,
            liquidation_rate,
            reserve_fee_share,
            max_borrow_market_index,
            max_deleverage_collateral_ratio_bps,
            secondary_borrow_currencies,
            max_required_account_collateral_ratio_bps,
        }
    }

    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_currency_id(mut self, currency_id: u16) -> Self {
        self.currency_id = currency_id;
        self
    }

    pub fn with_min_account_borrow_size(mut self, size: u32) -> Self {
        self.min_account_borrow_size = size;
        self
    }

    pub fn with_max_borrow_market_index(mut self, index: u8) -> Self {
        self.max_borrow_market_index = index;
        self
    }

    pub fn with_secondary_borrow_currencies(mut self, currencies: [u16; 2]) -> Self {
        self.secondary_borrow_currencies = currencies;
        self
    }

    /// Returns true if the given flag bit is set.
    pub fn has_flag(&self, flag: crate::VaultFlag) -> bool {
        self.flags & (1 << flag.bit()) != 0
    }
}
