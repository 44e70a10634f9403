use alloy_primitives::{Address, FixedBytes, U256};

/// Errors during host/token queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// Used by off-chain mocks or partially implemented providers.
    NotImplemented,
    /// Attempted to `staticcall` a selector that is not allowlisted.
    ForbiddenCall { target: Address, selector: [u8; 4] },
    /// The underlying call failed.
    CallFailed,
    /// Return data was malformed or could not be decoded.
    MalformedReturn,
}

impl core::fmt::Display for HostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HostError::NotImplemented => f.write_str("query not implemented"),
            HostError::ForbiddenCall { target, selector } => {
                write!(f, "forbidden call 0x{} on {target}", hex_selector(selector))
            }
            HostError::CallFailed => f.write_str("call failed"),
            HostError::MalformedReturn => f.write_str("malformed return data"),
        }
    }
}

fn hex_selector(selector: &[u8; 4]) -> String {
    selector.iter().map(|b| format!("{b:02x}")).collect()
}

/// Read-only view of the execution host and the token contracts it manages.
///
/// Implemented with bounded `staticcall`s on-chain and with static token
/// books or mocks off-chain. Everything except `agreement_class` has a
/// `NotImplemented` default so partial providers stay small.
pub trait HostContext {
    /// `ISuperfluid.getAgreementClass(bytes32)`.
    fn agreement_class(&self, agreement_type: FixedBytes<32>) -> Result<Address, HostError>;

    fn symbol(&self, _token: Address) -> Result<String, HostError> {
        Err(HostError::NotImplemented)
    }

    fn decimals(&self, _token: Address) -> Result<u8, HostError> {
        Err(HostError::NotImplemented)
    }

    /// `ISuperToken.getUnderlyingToken()`; the zero address for native wrappers.
    fn underlying_token(&self, _token: Address) -> Result<Address, HostError> {
        Err(HostError::NotImplemented)
    }

    /// `ISuperToken.toUnderlyingAmount(amount)` returning
    /// `(underlyingAmount, adjustedAmount)`.
    fn to_underlying_amount(
        &self,
        _token: Address,
        _amount: U256,
    ) -> Result<(U256, U256), HostError> {
        Err(HostError::NotImplemented)
    }

    fn native_balance(&self, _account: Address) -> Result<U256, HostError> {
        Err(HostError::NotImplemented)
    }
}
