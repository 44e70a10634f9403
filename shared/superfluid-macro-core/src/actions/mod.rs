//! Supported action kinds and their per-kind behaviour.
//!
//! Each kind owns a parameter tuple, a typed EIP-712 struct (human-readable
//! `action` sentence + parameters) and an operation builder. `ActionParams`
//! is the tagged union the dispatcher works with.

pub mod flows;
pub mod tokens;

use std::{borrow::Cow, fmt, str::FromStr};

use alloy_primitives::{Address, FixedBytes};
use alloy_sol_types::{SolStruct, SolType, SolValue};
use serde::{Deserialize, Serialize};

use crate::{
    codec::{Language, ProvidedParams},
    eip712::SigningDomain,
    errors::{MacroError, Result},
    host::HostContext,
    operations::Operation,
};

pub use flows::{DeleteFlowParams, FlowParams};
pub use tokens::{ApproveParams, TokenAmountParams, TransferParams};

/// Supported action kinds; the discriminant is the code used by
/// `ActionRegistry::standard`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum ActionKind {
    CreateFlow = 1,
    UpdateFlow = 2,
    DeleteFlow = 3,
    Upgrade = 4,
    Downgrade = 5,
    Approve = 6,
    Transfer = 7,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::CreateFlow,
        ActionKind::UpdateFlow,
        ActionKind::DeleteFlow,
        ActionKind::Upgrade,
        ActionKind::Downgrade,
        ActionKind::Approve,
        ActionKind::Transfer,
    ];

    pub fn default_code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::CreateFlow => "create-flow",
            ActionKind::UpdateFlow => "update-flow",
            ActionKind::DeleteFlow => "delete-flow",
            ActionKind::Upgrade => "upgrade",
            ActionKind::Downgrade => "downgrade",
            ActionKind::Approve => "approve",
            ActionKind::Transfer => "transfer",
        }
    }

    /// EIP-712 type descriptor, eg
    /// `SuperfluidCreateFlow(string action,address token,address receiver,int96 flowRate)`.
    pub fn type_descriptor(self) -> Cow<'static, str> {
        match self {
            ActionKind::CreateFlow => flows::SuperfluidCreateFlow::eip712_root_type(),
            ActionKind::UpdateFlow => flows::SuperfluidUpdateFlow::eip712_root_type(),
            ActionKind::DeleteFlow => flows::SuperfluidDeleteFlow::eip712_root_type(),
            ActionKind::Upgrade => tokens::SuperfluidUpgrade::eip712_root_type(),
            ActionKind::Downgrade => tokens::SuperfluidDowngrade::eip712_root_type(),
            ActionKind::Approve => tokens::SuperfluidApprove::eip712_root_type(),
            ActionKind::Transfer => tokens::SuperfluidTransfer::eip712_root_type(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown action kind `{s}`"))
    }
}

impl TryFrom<u8> for ActionKind {
    type Error = ();

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| *kind as u8 == value)
            .ok_or(())
    }
}

/// Inputs the builders need beyond the params themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildContext {
    /// Constant flow agreement, resolved from the host once at construction.
    pub cfa: Address,
}

/// Decoded parameters of one action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionParams {
    CreateFlow(FlowParams),
    UpdateFlow(FlowParams),
    DeleteFlow(DeleteFlowParams),
    Upgrade(TokenAmountParams),
    Downgrade(TokenAmountParams),
    Approve(ApproveParams),
    Transfer(TransferParams),
}

fn decode_tuple<T>(bytes: &[u8]) -> Result<T>
where
    T: SolValue + From<<<T as SolValue>::SolType as SolType>::RustType>,
{
    <T as SolValue>::abi_decode(bytes, true)
        .map_err(|_| MacroError::MalformedPayload("action params"))
}

impl ActionParams {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionParams::CreateFlow(_) => ActionKind::CreateFlow,
            ActionParams::UpdateFlow(_) => ActionKind::UpdateFlow,
            ActionParams::DeleteFlow(_) => ActionKind::DeleteFlow,
            ActionParams::Upgrade(_) => ActionKind::Upgrade,
            ActionParams::Downgrade(_) => ActionKind::Downgrade,
            ActionParams::Approve(_) => ActionKind::Approve,
            ActionParams::Transfer(_) => ActionKind::Transfer,
        }
    }

    /// Decode the ABI tuple expected for `kind`.
    pub fn decode(kind: ActionKind, bytes: &[u8]) -> Result<Self> {
        let params = match kind {
            ActionKind::CreateFlow => ActionParams::CreateFlow(decode_tuple(bytes)?),
            ActionKind::UpdateFlow => ActionParams::UpdateFlow(decode_tuple(bytes)?),
            ActionKind::DeleteFlow => ActionParams::DeleteFlow(decode_tuple(bytes)?),
            ActionKind::Upgrade => ActionParams::Upgrade(decode_tuple(bytes)?),
            ActionKind::Downgrade => ActionParams::Downgrade(decode_tuple(bytes)?),
            ActionKind::Approve => ActionParams::Approve(decode_tuple(bytes)?),
            ActionKind::Transfer => ActionParams::Transfer(decode_tuple(bytes)?),
        };
        Ok(params)
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            ActionParams::CreateFlow(p) | ActionParams::UpdateFlow(p) => p.abi_encode(),
            ActionParams::DeleteFlow(p) => p.abi_encode(),
            ActionParams::Upgrade(p) | ActionParams::Downgrade(p) => p.abi_encode(),
            ActionParams::Approve(p) => p.abi_encode(),
            ActionParams::Transfer(p) => p.abi_encode(),
        }
    }

    /// Full `providedParams` bytes to hand to the signer and the relayer.
    pub fn encode_provided(&self, action_code: u8, language: Language) -> Vec<u8> {
        ProvidedParams {
            action_code,
            language,
            action_params: self.encode().into(),
        }
        .encode()
    }

    /// Human-readable sentence the user signs.
    pub fn message<H: HostContext + ?Sized>(&self, host: &H, language: Language) -> Result<String> {
        if !language.is_english() {
            return Err(MacroError::UnsupportedLanguage(language));
        }
        match self {
            ActionParams::CreateFlow(p) => flows::create_message(host, p),
            ActionParams::UpdateFlow(p) => flows::update_message(host, p),
            ActionParams::DeleteFlow(p) => flows::delete_message(host, p),
            ActionParams::Upgrade(p) => tokens::upgrade_message(host, p),
            ActionParams::Downgrade(p) => tokens::downgrade_message(host, p),
            ActionParams::Approve(p) => tokens::approve_message(host, p),
            ActionParams::Transfer(p) => tokens::transfer_message(host, p),
        }
    }

    /// EIP-712 digest binding the message and every typed field.
    ///
    /// The language is checked before any token query or hashing.
    pub fn digest<H: HostContext + ?Sized>(
        &self,
        host: &H,
        domain: &SigningDomain,
        language: Language,
    ) -> Result<FixedBytes<32>> {
        let action = self.message(host, language)?;
        let digest = match self {
            ActionParams::CreateFlow(p) => domain.digest(&flows::create_typed(action, p)),
            ActionParams::UpdateFlow(p) => domain.digest(&flows::update_typed(action, p)),
            ActionParams::DeleteFlow(p) => domain.digest(&flows::delete_typed(action, p)),
            ActionParams::Upgrade(p) => domain.digest(&tokens::upgrade_typed(action, p)),
            ActionParams::Downgrade(p) => domain.digest(&tokens::downgrade_typed(action, p)),
            ActionParams::Approve(p) => domain.digest(&tokens::approve_typed(action, p)),
            ActionParams::Transfer(p) => domain.digest(&tokens::transfer_typed(action, p)),
        };
        Ok(digest)
    }

    /// Operations for this action, excluding any fee.
    pub fn build_operations(&self, ctx: &BuildContext, caller: Address) -> Vec<Operation> {
        let op = match self {
            ActionParams::CreateFlow(p) => flows::create_operation(ctx.cfa, p),
            ActionParams::UpdateFlow(p) => flows::update_operation(ctx.cfa, p),
            ActionParams::DeleteFlow(p) => flows::delete_operation(ctx.cfa, p),
            ActionParams::Upgrade(p) => tokens::upgrade_operation(p),
            ActionParams::Downgrade(p) => tokens::downgrade_operation(p),
            ActionParams::Approve(p) => tokens::approve_operation(p),
            ActionParams::Transfer(p) => tokens::transfer_operation(caller, p),
        };
        vec![op]
    }

    /// Kind-specific invariant checked after the host ran the batch. None of
    /// the standard kinds has one; fee settlement is checked by the dispatcher.
    pub fn post_check<H: HostContext + ?Sized>(&self, _host: &H, _caller: Address) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{aliases::I96, U256};

    fn create_flow_bytes() -> Vec<u8> {
        ActionParams::CreateFlow(FlowParams {
            token: Address::repeat_byte(0xda),
            receiver: Address::repeat_byte(0x22),
            flowRate: I96::try_from(1_157_407_407_407i64).unwrap(),
        })
        .encode()
    }

    fn assert_malformed(kind: ActionKind, bytes: &[u8]) {
        assert_eq!(
            ActionParams::decode(kind, bytes),
            Err(MacroError::MalformedPayload("action params"))
        );
    }

    #[test]
    fn test_clean_words_decode() {
        let bytes = create_flow_bytes();
        assert_eq!(bytes.len(), 96);
        assert!(ActionParams::decode(ActionKind::CreateFlow, &bytes).is_ok());
    }

    #[test]
    fn test_flow_rate_outside_int96_rejected() {
        // Highest byte of the flowRate word.
        let mut bytes = create_flow_bytes();
        bytes[64] = 0x01;
        assert_malformed(ActionKind::CreateFlow, &bytes);

        // First bit above the 96-bit value.
        let mut bytes = create_flow_bytes();
        bytes[83] = 0x01;
        assert_malformed(ActionKind::UpdateFlow, &bytes);
    }

    #[test]
    fn test_dirty_address_padding_rejected() {
        let mut bytes = create_flow_bytes();
        bytes[0] = 0x01;
        assert_malformed(ActionKind::CreateFlow, &bytes);

        let mut transfer = ActionParams::Transfer(TransferParams {
            token: Address::repeat_byte(0xda),
            receiver: Address::repeat_byte(0x22),
            amount: U256::from(1u64),
        })
        .encode();
        transfer[32 + 11] = 0xff;
        assert_malformed(ActionKind::Transfer, &transfer);
    }

    #[test]
    fn test_negative_flow_rate_sign_extension_accepted() {
        let bytes = ActionParams::UpdateFlow(FlowParams {
            token: Address::repeat_byte(0xda),
            receiver: Address::repeat_byte(0x22),
            flowRate: I96::try_from(-1i64).unwrap(),
        })
        .encode();
        assert!(bytes[64..96].iter().all(|b| *b == 0xff));
        assert!(ActionParams::decode(ActionKind::UpdateFlow, &bytes).is_ok());
    }
}
