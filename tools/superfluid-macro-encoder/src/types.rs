use alloy_primitives::{aliases::I96, Address, U256};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use superfluid_macro_core::{
    actions::{ApproveParams, DeleteFlowParams, FlowParams, TokenAmountParams, TransferParams},
    ActionKind, ActionParams, Language,
};

/// One action to encode and sign, as read from a request file.
///
/// ```json
/// {
///   "code": 1,
///   "language": "en",
///   "action": {
///     "kind": "create-flow",
///     "token": "0x…",
///     "receiver": "0x…",
///     "flowRate": 1157407407407
///   }
/// }
/// ```
///
/// `code` defaults to the kind's standard code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(default)]
    pub code: Option<u8>,
    #[serde(default = "default_language")]
    pub language: String,
    pub action: RequestedAction,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum RequestedAction {
    CreateFlow {
        token: Address,
        receiver: Address,
        flow_rate: i128,
    },
    UpdateFlow {
        token: Address,
        receiver: Address,
        flow_rate: i128,
    },
    DeleteFlow {
        token: Address,
        sender: Address,
        receiver: Address,
    },
    Upgrade {
        token: Address,
        amount: U256,
    },
    Downgrade {
        token: Address,
        amount: U256,
    },
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Transfer {
        token: Address,
        receiver: Address,
        amount: U256,
    },
}

fn flow_rate(rate: i128) -> Result<I96> {
    I96::try_from(rate).map_err(|_| anyhow!("flow rate {rate} does not fit in int96"))
}

impl RequestedAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            RequestedAction::CreateFlow { .. } => ActionKind::CreateFlow,
            RequestedAction::UpdateFlow { .. } => ActionKind::UpdateFlow,
            RequestedAction::DeleteFlow { .. } => ActionKind::DeleteFlow,
            RequestedAction::Upgrade { .. } => ActionKind::Upgrade,
            RequestedAction::Downgrade { .. } => ActionKind::Downgrade,
            RequestedAction::Approve { .. } => ActionKind::Approve,
            RequestedAction::Transfer { .. } => ActionKind::Transfer,
        }
    }

    pub fn to_params(&self) -> Result<ActionParams> {
        let params = match *self {
            RequestedAction::CreateFlow {
                token,
                receiver,
                flow_rate: rate,
            } => ActionParams::CreateFlow(FlowParams {
                token,
                receiver,
                flowRate: flow_rate(rate)?,
            }),
            RequestedAction::UpdateFlow {
                token,
                receiver,
                flow_rate: rate,
            } => ActionParams::UpdateFlow(FlowParams {
                token,
                receiver,
                flowRate: flow_rate(rate)?,
            }),
            RequestedAction::DeleteFlow {
                token,
                sender,
                receiver,
            } => ActionParams::DeleteFlow(DeleteFlowParams {
                token,
                sender,
                receiver,
            }),
            RequestedAction::Upgrade { token, amount } => {
                ActionParams::Upgrade(TokenAmountParams { token, amount })
            }
            RequestedAction::Downgrade { token, amount } => {
                ActionParams::Downgrade(TokenAmountParams { token, amount })
            }
            RequestedAction::Approve {
                token,
                spender,
                amount,
            } => ActionParams::Approve(ApproveParams {
                token,
                spender,
                amount,
            }),
            RequestedAction::Transfer {
                token,
                receiver,
                amount,
            } => ActionParams::Transfer(TransferParams {
                token,
                receiver,
                amount,
            }),
        };
        Ok(params)
    }
}

impl ActionRequest {
    pub fn action_code(&self) -> u8 {
        self.code.unwrap_or_else(|| self.action.kind().default_code())
    }

    pub fn language(&self) -> Result<Language> {
        Language::from_tag(&self.language)
            .ok_or_else(|| anyhow!("language tag `{}` is longer than 32 bytes", self.language))
    }
}
