use alloy_primitives::{Address, Bytes};

/// Batch operation types the macro emits, with the Superfluid host's
/// `batchCall` ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum OperationType {
    Erc20Approve = 1,
    Erc20TransferFrom = 2,

    SuperTokenUpgrade = 101,
    SuperTokenDowngrade = 102,

    CallAgreement = 201,

    SimpleForwardCall = 301,
}

impl OperationType {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for OperationType {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        use OperationType::*;
        let kind = match value {
            1 => Erc20Approve,
            2 => Erc20TransferFrom,
            101 => SuperTokenUpgrade,
            102 => SuperTokenDowngrade,
            201 => CallAgreement,
            301 => SimpleForwardCall,
            _ => return Err(()),
        };
        Ok(kind)
    }
}

/// One host-level instruction. The host executes a batch in list order and
/// reverts the whole batch if any operation fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationType,
    pub target: Address,
    pub data: Bytes,
}

impl Operation {
    pub fn new(kind: OperationType, target: Address, data: impl Into<Bytes>) -> Self {
        Self {
            kind,
            target,
            data: data.into(),
        }
    }

    /// `(uint32 operationType, address target, bytes data)`, the ABI shape of
    /// `ISuperfluid.Operation`.
    pub fn into_abi_tuple(self) -> (u32, Address, Bytes) {
        (self.kind.as_u32(), self.target, self.data)
    }
}
