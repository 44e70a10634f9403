use alloc::{collections::BTreeSet, string::String, vec::Vec};

use alloy_sol_types::SolCall;
use stylus_sdk::{
    alloy_primitives::{Address, FixedBytes, U256},
    call::RawCall,
};
use superfluid_macro_core::{HostContext, HostError};

use crate::superfluid::interfaces::{ISuperToken, ISuperfluid};

/// Read-only Superfluid host view backed by `staticcall` with a strict selector
/// allowlist and a per-call gas cap.
///
/// The host only answers `getAgreementClass`; token metadata selectors may be
/// called on any token the signed params name. The macro's own native balance
/// is a snapshot taken by the caller.
pub struct OnchainHost {
    pub host: Address,
    pub gas_cap: u64,
    pub balance_of_self: (Address, U256),
    token_selectors: BTreeSet<[u8; 4]>,
}

impl OnchainHost {
    pub fn new(host: Address, gas_cap: u64, balance_of_self: (Address, U256)) -> Self {
        let mut token_selectors = BTreeSet::new();
        token_selectors.insert(ISuperToken::symbolCall::SELECTOR);
        token_selectors.insert(ISuperToken::decimalsCall::SELECTOR);
        token_selectors.insert(ISuperToken::getUnderlyingTokenCall::SELECTOR);
        token_selectors.insert(ISuperToken::toUnderlyingAmountCall::SELECTOR);

        Self {
            host,
            gas_cap,
            balance_of_self,
            token_selectors,
        }
    }

    fn is_allowed(&self, target: Address, selector: [u8; 4]) -> bool {
        if target == self.host {
            return selector == ISuperfluid::getAgreementClassCall::SELECTOR;
        }
        target != Address::ZERO && self.token_selectors.contains(&selector)
    }

    fn staticcall<C: SolCall>(&self, target: Address, call: &C) -> Result<C::Return, HostError> {
        if !self.is_allowed(target, C::SELECTOR) {
            return Err(HostError::ForbiddenCall {
                target,
                selector: C::SELECTOR,
            });
        }
        let data: Vec<u8> = call.abi_encode();

        // bytes-in, bytes-out staticcall with gas cap.
        let out = unsafe { RawCall::new_static().gas(self.gas_cap).call(target, &data) }
            .map_err(|_| HostError::CallFailed)?;
        C::abi_decode_returns(&out, true).map_err(|_| HostError::MalformedReturn)
    }
}

impl HostContext for OnchainHost {
    fn agreement_class(&self, agreement_type: FixedBytes<32>) -> Result<Address, HostError> {
        let ret = self.staticcall(
            self.host,
            &ISuperfluid::getAgreementClassCall {
                agreementType: agreement_type,
            },
        )?;
        if ret.agreementClass == Address::ZERO {
            return Err(HostError::MalformedReturn);
        }
        Ok(ret.agreementClass)
    }

    fn symbol(&self, token: Address) -> Result<String, HostError> {
        Ok(self.staticcall(token, &ISuperToken::symbolCall {})?._0)
    }

    fn decimals(&self, token: Address) -> Result<u8, HostError> {
        Ok(self.staticcall(token, &ISuperToken::decimalsCall {})?._0)
    }

    fn underlying_token(&self, token: Address) -> Result<Address, HostError> {
        Ok(self
            .staticcall(token, &ISuperToken::getUnderlyingTokenCall {})?
            ._0)
    }

    fn to_underlying_amount(&self, token: Address, amount: U256) -> Result<(U256, U256), HostError> {
        let ret = self.staticcall(token, &ISuperToken::toUnderlyingAmountCall { amount })?;
        Ok((ret.underlyingAmount, ret.adjustedAmount))
    }

    fn native_balance(&self, account: Address) -> Result<U256, HostError> {
        let (holder, balance) = self.balance_of_self;
        if account != holder {
            return Err(HostError::NotImplemented);
        }
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OnchainHost {
        OnchainHost::new(
            Address::repeat_byte(0x5f),
            200_000,
            (Address::repeat_byte(0x4d), U256::from(7u64)),
        )
    }

    #[test]
    fn test_host_only_answers_agreement_lookup() {
        let host = provider();
        assert!(host.is_allowed(host.host, ISuperfluid::getAgreementClassCall::SELECTOR));
        assert!(!host.is_allowed(host.host, ISuperToken::symbolCall::SELECTOR));
    }

    #[test]
    fn test_token_selectors_allowlisted() {
        let host = provider();
        let token = Address::repeat_byte(0xda);
        assert!(host.is_allowed(token, ISuperToken::symbolCall::SELECTOR));
        assert!(host.is_allowed(token, ISuperToken::toUnderlyingAmountCall::SELECTOR));
        assert!(!host.is_allowed(token, ISuperfluid::getAgreementClassCall::SELECTOR));
        assert!(!host.is_allowed(Address::ZERO, ISuperToken::symbolCall::SELECTOR));
    }

    #[test]
    fn test_forbidden_call_never_reaches_the_vm() {
        let host = provider();
        let err = host
            .staticcall(Address::ZERO, &ISuperToken::decimalsCall {})
            .unwrap_err();
        assert_eq!(
            err,
            HostError::ForbiddenCall {
                target: Address::ZERO,
                selector: ISuperToken::decimalsCall::SELECTOR,
            }
        );
    }

    #[test]
    fn test_native_balance_snapshot() {
        let host = provider();
        assert_eq!(
            host.native_balance(Address::repeat_byte(0x4d)),
            Ok(U256::from(7u64))
        );
        assert_eq!(
            host.native_balance(Address::repeat_byte(0x01)),
            Err(HostError::NotImplemented)
        );
    }
}
