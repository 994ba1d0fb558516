//! Vault deposit payloads.
//!
//! `enterVault` forwards an opaque `bytes` blob to the strategy vault. The
//! Balancer vaults decode it as `(uint256 minBPT, bytes tradeData)`.

use alloy::primitives::{Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolValue;

use crate::{DexId, TradeType};

sol! {
    struct TradeParamsAbi {
        uint16 dexId;
        uint8 tradeType;
        uint32 oracleSlippagePercent;
        bool tradeUnwrapped;
        bytes exchangeData;
    }

    struct DepositTradeParamsAbi {
        uint256 tradeAmount;
        TradeParamsAbi tradeParams;
    }

    struct DepositParamsAbi {
        uint256 minBPT;
        bytes tradeData;
    }
}

/// Secondary trade executed by the vault while entering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositTradeParams {
    pub dex: DexId,
    pub trade_type: TradeType,
    pub amount: U256,
    /// Oracle slippage with 1e8 precision
    pub oracle_slippage_percent: u32,
    pub trade_unwrapped: bool,
    pub exchange_data: Bytes,
}

impl DepositTradeParams {
    pub fn abi_encode(&self) -> Bytes {
        DepositTradeParamsAbi {
            tradeAmount: self.amount,
            tradeParams: TradeParamsAbi {
                dexId: self.dex.id(),
                tradeType: self.trade_type.id(),
                oracleSlippagePercent: self.oracle_slippage_percent,
                tradeUnwrapped: self.trade_unwrapped,
                exchangeData: self.exchange_data.clone(),
            },
        }
        .abi_encode()
        .into()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositParams {
    pub min_pool_claim: U256,
    pub trade: Option<DepositTradeParams>,
}

impl DepositParams {
    pub fn with_trade(trade: DepositTradeParams) -> Self {
        Self {
            min_pool_claim: U256::ZERO,
            trade: Some(trade),
        }
    }

    /// Encodes the payload passed as `vaultData` to `enterVault`.
    pub fn abi_encode(&self) -> Bytes {
        let trade_data = self
            .trade
            .as_ref()
            .map(DepositTradeParams::abi_encode)
            .unwrap_or_default();
        DepositParamsAbi {
            minBPT: self.min_pool_claim,
            tradeData: trade_data,
        }
        .abi_encode()
        .into()
    }
}
