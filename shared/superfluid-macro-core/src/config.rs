use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{
    eip712::SigningDomain,
    errors::Result,
    registry::{Action, ActionRegistry},
};

/// Native-currency fee charged on fee-bearing actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfig {
    pub receiver: Address,
    pub amount: U256,
}

/// Deployment configuration of a macro instance.
///
/// ```json
/// {
///   "domain": { "chainId": 10, "verifyingContract": "0x…" },
///   "fee": { "receiver": "0x…", "amount": "0x2386f26fc10000" },
///   "actions": [{ "code": 1, "kind": "create-flow", "feeBearing": true }]
/// }
/// ```
///
/// `actions` defaults to [`ActionRegistry::standard`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroConfig {
    pub domain: SigningDomain,
    #[serde(default)]
    pub fee: Option<FeeConfig>,
    #[serde(default)]
    pub actions: Option<Vec<Action>>,
}

impl MacroConfig {
    pub fn new(domain: SigningDomain) -> Self {
        Self {
            domain,
            fee: None,
            actions: None,
        }
    }

    pub fn registry(&self) -> Result<ActionRegistry> {
        match &self.actions {
            Some(actions) => ActionRegistry::from_actions(actions.iter().copied()),
            None => Ok(ActionRegistry::standard()),
        }
    }
}
