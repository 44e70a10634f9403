//! In-memory Superfluid host for dispatcher tests.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use alloy_sol_types::SolValue;
use k256::ecdsa::SigningKey;
use superfluid_macro_core::{
    cfa_agreement_type, crypto::address_of, Envelope, HostContext, HostError, Operation,
    OperationType, SignatureVrs,
};

#[derive(Clone, Debug)]
struct TokenInfo {
    symbol: String,
    decimals: u8,
    underlying: Address,
}

/// Mock host with token metadata, ERC-20 style balances and native balances.
///
/// `execute` applies the subset of batch operations the tests need.
pub struct MockHost {
    pub cfa: Address,
    tokens: HashMap<Address, TokenInfo>,
    balances: RefCell<HashMap<(Address, Address), U256>>,
    native: RefCell<HashMap<Address, U256>>,
    queries: Cell<usize>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            cfa: Address::repeat_byte(0xcf),
            tokens: HashMap::new(),
            balances: RefCell::new(HashMap::new()),
            native: RefCell::new(HashMap::new()),
            queries: Cell::new(0),
        }
    }

    /// Register `token` as a super token wrapping an ERC-20 `underlying`.
    pub fn with_super_token(
        mut self,
        token: Address,
        symbol: &str,
        underlying: Address,
        underlying_symbol: &str,
        underlying_decimals: u8,
    ) -> Self {
        self.tokens.insert(
            token,
            TokenInfo {
                symbol: symbol.to_string(),
                decimals: 18,
                underlying,
            },
        );
        self.tokens.insert(
            underlying,
            TokenInfo {
                symbol: underlying_symbol.to_string(),
                decimals: underlying_decimals,
                underlying: Address::ZERO,
            },
        );
        self
    }

    pub fn set_balance(&self, token: Address, holder: Address, amount: U256) {
        self.balances.borrow_mut().insert((token, holder), amount);
    }

    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.balances
            .borrow()
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_native(&self, holder: Address, amount: U256) {
        self.native.borrow_mut().insert(holder, amount);
    }

    pub fn native_of(&self, holder: Address) -> U256 {
        self.native.borrow().get(&holder).copied().unwrap_or_default()
    }

    /// Number of token/native queries served so far.
    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    fn info(&self, token: Address) -> Result<&TokenInfo, HostError> {
        self.queries.set(self.queries.get() + 1);
        self.tokens.get(&token).ok_or(HostError::CallFailed)
    }

    /// Apply `operations` in order on behalf of `caller`, all or nothing.
    pub fn execute(&self, caller: Address, operations: &[Operation]) -> Result<(), String> {
        let balances = self.balances.borrow().clone();
        let native = self.native.borrow().clone();
        for op in operations {
            if let Err(err) = self.apply(caller, op) {
                *self.balances.borrow_mut() = balances;
                *self.native.borrow_mut() = native;
                return Err(err);
            }
        }
        Ok(())
    }

    fn apply(&self, caller: Address, op: &Operation) -> Result<(), String> {
        match op.kind {
            OperationType::SuperTokenUpgrade => {
                let amount = U256::from_be_slice(&op.data);
                let underlying = self.underlying_token(op.target).map_err(|e| e.to_string())?;
                let (underlying_amount, adjusted) = self
                    .to_underlying_amount(op.target, amount)
                    .map_err(|e| e.to_string())?;
                self.debit(underlying, caller, underlying_amount)?;
                self.credit(op.target, caller, adjusted);
                Ok(())
            }
            OperationType::SimpleForwardCall => {
                let (_call_data, value) = <(Bytes, U256)>::abi_decode_params(&op.data, true)
                    .map_err(|e| e.to_string())?;
                let mut native = self.native.borrow_mut();
                let paid = native.entry(caller).or_default();
                if *paid < value {
                    return Err("insufficient native balance".to_string());
                }
                *paid -= value;
                *native.entry(op.target).or_default() += value;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn debit(&self, token: Address, holder: Address, amount: U256) -> Result<(), String> {
        let mut balances = self.balances.borrow_mut();
        let balance = balances.entry((token, holder)).or_default();
        if *balance < amount {
            return Err("insufficient balance".to_string());
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&self, token: Address, holder: Address, amount: U256) {
        *self.balances.borrow_mut().entry((token, holder)).or_default() += amount;
    }
}

impl HostContext for MockHost {
    fn agreement_class(&self, agreement_type: FixedBytes<32>) -> Result<Address, HostError> {
        if agreement_type == cfa_agreement_type() {
            Ok(self.cfa)
        } else {
            Err(HostError::CallFailed)
        }
    }

    fn symbol(&self, token: Address) -> Result<String, HostError> {
        Ok(self.info(token)?.symbol.clone())
    }

    fn decimals(&self, token: Address) -> Result<u8, HostError> {
        Ok(self.info(token)?.decimals)
    }

    fn underlying_token(&self, token: Address) -> Result<Address, HostError> {
        Ok(self.info(token)?.underlying)
    }

    fn to_underlying_amount(&self, token: Address, amount: U256) -> Result<(U256, U256), HostError> {
        let underlying = self.info(token)?.underlying;
        let decimals = if underlying == Address::ZERO {
            18
        } else {
            self.info(underlying)?.decimals
        };
        if decimals < 18 {
            let factor = U256::from(10u64).pow(U256::from(18 - decimals));
            let underlying_amount = amount / factor;
            Ok((underlying_amount, underlying_amount * factor))
        } else {
            let factor = U256::from(10u64).pow(U256::from(decimals - 18));
            Ok((amount * factor, amount))
        }
    }

    fn native_balance(&self, account: Address) -> Result<U256, HostError> {
        self.queries.set(self.queries.get() + 1);
        Ok(self.native_of(account))
    }
}

pub fn signer(byte: u8) -> (SigningKey, Address) {
    let key = SigningKey::from_slice(&[byte; 32]).expect("valid scalar");
    let address = address_of(key.verifying_key());
    (key, address)
}

pub fn sign(key: &SigningKey, digest: FixedBytes<32>) -> SignatureVrs {
    let (sig, recid) = key
        .sign_prehash_recoverable(digest.as_slice())
        .expect("signing succeeds");
    let rs = sig.to_bytes();
    SignatureVrs {
        v: 27 + recid.to_byte(),
        r: FixedBytes::from_slice(&rs[..32]),
        s: FixedBytes::from_slice(&rs[32..]),
    }
}

pub fn seal(provided: Vec<u8>, signature: &SignatureVrs) -> Vec<u8> {
    Envelope {
        provided_params: provided.into(),
        signature: signature.encode().into(),
    }
    .encode()
}
