//! ERC-20 and cToken handles keyed by symbol.

use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use alloy::rpc::types::TransactionReceipt;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::contracts::{ICToken, IERC20};
use crate::tx::send_and_confirm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Erc20,
    /// Compound-style asset token, symbols prefixed with `c`
    CToken,
}

impl TokenKind {
    pub fn for_symbol(symbol: &str) -> Self {
        if symbol.starts_with('c') {
            TokenKind::CToken
        } else {
            TokenKind::Erc20
        }
    }
}

#[derive(Clone)]
pub struct TokenHandle {
    pub symbol: String,
    pub address: Address,
    pub kind: TokenKind,
    provider: Arc<DynProvider>,
}

impl TokenHandle {
    pub fn new(symbol: &str, address: Address, provider: Arc<DynProvider>) -> Self {
        Self {
            symbol: symbol.to_string(),
            address,
            kind: TokenKind::for_symbol(symbol),
            provider,
        }
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        let balance = match self.kind {
            TokenKind::Erc20 => {
                IERC20::new(self.address, &self.provider)
                    .balanceOf(account)
                    .call()
                    .await?
            }
            TokenKind::CToken => {
                ICToken::new(self.address, &self.provider)
                    .balanceOf(account)
                    .call()
                    .await?
            }
        };
        Ok(balance)
    }

    /// Moves `amount` from `from`, typically an impersonated whale.
    pub async fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<TransactionReceipt> {
        send_and_confirm(
            IERC20::new(self.address, &self.provider)
                .transfer(to, amount)
                .from(from),
            "transfer",
        )
        .await
    }

    pub async fn approve(&self, owner: Address, spender: Address, amount: U256) -> Result<TransactionReceipt> {
        send_and_confirm(
            IERC20::new(self.address, &self.provider)
                .approve(spender, amount)
                .from(owner),
            "approve",
        )
        .await
    }

    /// Underlying asset of a cToken; `None` for plain ERC-20s.
    pub async fn underlying(&self) -> Result<Option<Address>> {
        match self.kind {
            TokenKind::Erc20 => Ok(None),
            TokenKind::CToken => Ok(Some(
                ICToken::new(self.address, &self.provider)
                    .underlying()
                    .call()
                    .await?,
            )),
        }
    }
}

impl std::fmt::Debug for TokenHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenHandle")
            .field("symbol", &self.symbol)
            .field("address", &self.address)
            .field("kind", &self.kind)
            .finish()
    }
}
