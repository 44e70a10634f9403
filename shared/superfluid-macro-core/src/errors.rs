use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::{codec::Language, host::HostError};

/// Errors raised while registering, authenticating, building or post-checking
/// a macro action. Every error is terminal for the current invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MacroError {
    /// Byte layout does not match the expected ABI tuple.
    #[error("malformed payload: {0}")]
    MalformedPayload(&'static str),

    #[error("unknown action code {0}")]
    UnknownActionCode(u8),

    /// Code 0 is the "not found" sentinel.
    #[error("action code 0 is reserved")]
    ActionCodeZeroNotAllowed,

    #[error("action code {0} registered twice")]
    DuplicateActionCode(u8),

    #[error("unsupported language {0}")]
    UnsupportedLanguage(Language),

    #[error("signature does not recover to {signer}")]
    InvalidSignature { signer: Address },

    /// Native currency left on the macro after the batch.
    #[error("fee overpaid, {leftover} wei left behind")]
    FeeOverpaid { leftover: U256 },

    #[error("host query failed: {0}")]
    Host(HostError),
}

impl From<HostError> for MacroError {
    fn from(err: HostError) -> Self {
        MacroError::Host(err)
    }
}

pub type Result<T> = core::result::Result<T, MacroError>;
