//! EIP-712 domain and digest construction for clear-signed actions.
//!
//! The signer sees a typed struct whose first field is the human-readable
//! `action` sentence, followed by the machine parameters. Binding both in one
//! struct hash ties the message the user read to the parameters executed.

use std::borrow::Cow;

use alloy_primitives::{keccak256, Address, FixedBytes, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DOMAIN_NAME: &str = "Superfluid Macro";
pub const DEFAULT_DOMAIN_VERSION: &str = "1";

/// `EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningDomain {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

fn default_name() -> String {
    DEFAULT_DOMAIN_NAME.to_string()
}

fn default_version() -> String {
    DEFAULT_DOMAIN_VERSION.to_string()
}

impl SigningDomain {
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            chain_id,
            verifying_contract,
        }
    }

    pub fn eip712(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(Cow::Owned(self.name.clone())),
            Some(Cow::Owned(self.version.clone())),
            Some(U256::from(self.chain_id)),
            Some(self.verifying_contract),
            None,
        )
    }

    pub fn separator(&self) -> FixedBytes<32> {
        self.eip712().hash_struct()
    }

    /// Final digest of a typed action struct under this domain.
    pub fn digest<T: SolStruct>(&self, typed: &T) -> FixedBytes<32> {
        typed_data_digest(self.separator(), typed.eip712_hash_struct())
    }
}

/// `keccak256("\x19\x01" || domainSeparator || structHash)`.
pub fn typed_data_digest(
    domain_separator: FixedBytes<32>,
    struct_hash: FixedBytes<32>,
) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(b"\x19\x01");
    buf.extend_from_slice(domain_separator.as_slice());
    buf.extend_from_slice(struct_hash.as_slice());
    keccak256(buf)
}
