//! Fee charged on fee-bearing actions.
//!
//! The fee operation goes first in the batch. The host executes the batch
//! atomically, so the fee only moves if every later operation succeeds.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;

use crate::{
    config::FeeConfig,
    errors::{MacroError, Result},
    host::HostContext,
    operations::{Operation, OperationType},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeInjector {
    fee: FeeConfig,
}

impl FeeInjector {
    pub fn new(fee: FeeConfig) -> Self {
        Self { fee }
    }

    pub fn config(&self) -> &FeeConfig {
        &self.fee
    }

    /// Plain native transfer to the receiver: `abi.encode(bytes callData, uint256 value)`
    /// with empty call data.
    pub fn operation(&self) -> Operation {
        let data = (Bytes::new(), self.fee.amount).abi_encode_params();
        Operation::new(OperationType::SimpleForwardCall, self.fee.receiver, data)
    }

    pub fn inject(&self, operations: Vec<Operation>) -> Vec<Operation> {
        let mut batch = Vec::with_capacity(operations.len() + 1);
        batch.push(self.operation());
        batch.extend(operations);
        batch
    }

    /// The whole fee must have been forwarded: `holder` keeps no native balance.
    pub fn check_settled<H: HostContext + ?Sized>(&self, host: &H, holder: Address) -> Result<()> {
        let leftover = host.native_balance(holder)?;
        if leftover != U256::ZERO {
            return Err(MacroError::FeeOverpaid { leftover });
        }
        Ok(())
    }
}

/// Decode a fee operation's `(callData, value)`.
pub fn decode_fee_data(data: &[u8]) -> Result<(Bytes, U256)> {
    <(Bytes, U256)>::abi_decode_params(data, true)
        .map_err(|_| MacroError::MalformedPayload("fee operation"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostError;
    use alloy_primitives::FixedBytes;

    struct Balance(U256);

    impl HostContext for Balance {
        fn agreement_class(&self, _: FixedBytes<32>) -> core::result::Result<Address, HostError> {
            Ok(Address::ZERO)
        }

        fn native_balance(&self, _: Address) -> core::result::Result<U256, HostError> {
            Ok(self.0)
        }
    }

    fn injector() -> FeeInjector {
        FeeInjector::new(FeeConfig {
            receiver: Address::repeat_byte(0xfe),
            amount: U256::from(1_000u64),
        })
    }

    #[test]
    fn test_fee_goes_first() {
        let tail = Operation::new(OperationType::Erc20Approve, Address::repeat_byte(1), vec![1u8]);
        let batch = injector().inject(vec![tail.clone()]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].kind, OperationType::SimpleForwardCall);
        assert_eq!(batch[0].target, Address::repeat_byte(0xfe));
        assert_eq!(batch[1], tail);

        let (call_data, value) = decode_fee_data(&batch[0].data).unwrap();
        assert!(call_data.is_empty());
        assert_eq!(value, U256::from(1_000u64));
    }

    #[test]
    fn test_leftover_balance_is_overpaid() {
        let holder = Address::repeat_byte(0xcc);
        assert!(injector().check_settled(&Balance(U256::ZERO), holder).is_ok());
        assert_eq!(
            injector().check_settled(&Balance(U256::from(5u64)), holder),
            Err(MacroError::FeeOverpaid {
                leftover: U256::from(5u64)
            })
        );
    }
}
