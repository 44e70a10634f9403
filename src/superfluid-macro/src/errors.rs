//! Solidity custom errors surfaced by the contract.

use alloy_sol_types::sol;
use stylus_sdk::{
    alloy_primitives::{Address, FixedBytes},
    stylus_proc::SolidityError,
};
use superfluid_macro_core::{HostError, MacroError};

sol! {
    error MalformedPayload();
    error UnknownActionCode(uint8 code);
    error InvalidActionRegistry();
    error UnsupportedLanguage(bytes32 lang);
    error InvalidSignature(address signer);
    error FeeOverpaid(uint256 leftover);
    error HostQueryFailed(address target, bytes4 selector);
    error AlreadyInitialized();
    error NotInitialized();
    error NotOwner(address caller);
    error UnknownHost(address host);
}

#[derive(SolidityError)]
pub enum MacroRevert {
    MalformedPayload(MalformedPayload),
    UnknownActionCode(UnknownActionCode),
    InvalidActionRegistry(InvalidActionRegistry),
    UnsupportedLanguage(UnsupportedLanguage),
    InvalidSignature(InvalidSignature),
    FeeOverpaid(FeeOverpaid),
    HostQueryFailed(HostQueryFailed),
    AlreadyInitialized(AlreadyInitialized),
    NotInitialized(NotInitialized),
    NotOwner(NotOwner),
    UnknownHost(UnknownHost),
}

impl From<MacroError> for MacroRevert {
    fn from(err: MacroError) -> Self {
        match err {
            MacroError::MalformedPayload(_) => MacroRevert::MalformedPayload(MalformedPayload {}),
            MacroError::UnknownActionCode(code) => {
                MacroRevert::UnknownActionCode(UnknownActionCode { code })
            }
            MacroError::ActionCodeZeroNotAllowed | MacroError::DuplicateActionCode(_) => {
                MacroRevert::InvalidActionRegistry(InvalidActionRegistry {})
            }
            MacroError::UnsupportedLanguage(lang) => {
                MacroRevert::UnsupportedLanguage(UnsupportedLanguage { lang: lang.0 })
            }
            MacroError::InvalidSignature { signer } => {
                MacroRevert::InvalidSignature(InvalidSignature { signer })
            }
            MacroError::FeeOverpaid { leftover } => MacroRevert::FeeOverpaid(FeeOverpaid { leftover }),
            MacroError::Host(err) => {
                let (target, selector): (Address, FixedBytes<4>) = match err {
                    HostError::ForbiddenCall { target, selector } => (target, selector.into()),
                    _ => Default::default(),
                };
                MacroRevert::HostQueryFailed(HostQueryFailed { target, selector })
            }
        }
    }
}
