//! Static token book for off-chain message rendering.

use std::{collections::BTreeMap, fs, path::Path};

use alloy_primitives::{Address, FixedBytes, U256};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use superfluid_macro_core::{cfa_agreement_type, format::SUPER_TOKEN_DECIMALS, HostContext, HostError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntry {
    pub symbol: String,
    pub decimals: u8,
    /// Wrapped token of a super token. Absent for plain ERC-20s and for
    /// native-asset wrappers.
    #[serde(default)]
    pub underlying: Option<Address>,
}

/// Token metadata snapshot standing in for the host and token contracts.
///
/// ```json
/// {
///   "cfa": "0x…",
///   "tokens": {
///     "0x…DAIx": { "symbol": "DAIx", "decimals": 18, "underlying": "0x…DAI" },
///     "0x…DAI":  { "symbol": "DAI", "decimals": 18 }
///   }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticTokenBook {
    #[serde(default)]
    pub cfa: Address,
    #[serde(default)]
    pub tokens: BTreeMap<Address, TokenEntry>,
}

impl StaticTokenBook {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read token book {}", path.display()))?;
        let book: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse token book {}", path.display()))?;
        tracing::debug!(tokens = book.tokens.len(), path = %path.display(), "token book loaded");
        Ok(book)
    }

    pub fn insert(&mut self, token: Address, entry: TokenEntry) -> &mut Self {
        self.tokens.insert(token, entry);
        self
    }

    fn entry(&self, token: Address) -> Result<&TokenEntry, HostError> {
        self.tokens.get(&token).ok_or_else(|| {
            tracing::warn!(%token, "token missing from token book");
            HostError::CallFailed
        })
    }

    fn underlying_decimals(&self, token: Address) -> Result<u8, HostError> {
        match self.entry(token)?.underlying {
            Some(underlying) if underlying != Address::ZERO => Ok(self.entry(underlying)?.decimals),
            _ => Ok(SUPER_TOKEN_DECIMALS),
        }
    }
}

impl HostContext for StaticTokenBook {
    fn agreement_class(&self, agreement_type: FixedBytes<32>) -> Result<Address, HostError> {
        if agreement_type != cfa_agreement_type() {
            return Err(HostError::CallFailed);
        }
        Ok(self.cfa)
    }

    fn symbol(&self, token: Address) -> Result<String, HostError> {
        Ok(self.entry(token)?.symbol.clone())
    }

    fn decimals(&self, token: Address) -> Result<u8, HostError> {
        Ok(self.entry(token)?.decimals)
    }

    fn underlying_token(&self, token: Address) -> Result<Address, HostError> {
        Ok(self.entry(token)?.underlying.unwrap_or(Address::ZERO))
    }

    /// Same rounding as `SuperToken.toUnderlyingAmount`: amounts are truncated
    /// to what the underlying can represent.
    fn to_underlying_amount(&self, token: Address, amount: U256) -> Result<(U256, U256), HostError> {
        let decimals = self.underlying_decimals(token)?;
        let ten = U256::from(10u64);
        if decimals < SUPER_TOKEN_DECIMALS {
            let factor = ten.pow(U256::from(SUPER_TOKEN_DECIMALS - decimals));
            let underlying_amount = amount / factor;
            Ok((underlying_amount, underlying_amount * factor))
        } else if decimals > SUPER_TOKEN_DECIMALS {
            let factor = ten.pow(U256::from(decimals - SUPER_TOKEN_DECIMALS));
            let underlying_amount = amount.checked_mul(factor).ok_or(HostError::MalformedReturn)?;
            Ok((underlying_amount, amount))
        } else {
            Ok((amount, amount))
        }
    }
}
