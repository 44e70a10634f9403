use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    actions::ActionKind,
    errors::{MacroError, Result},
};

/// One registry entry: which kind a numeric code dispatches to and whether
/// the batch carries the fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub code: u8,
    pub kind: ActionKind,
    #[serde(default)]
    pub fee_bearing: bool,
}

impl Action {
    pub fn new(code: u8, kind: ActionKind) -> Self {
        Self {
            code,
            kind,
            fee_bearing: false,
        }
    }

    pub fn with_fee(mut self) -> Self {
        self.fee_bearing = true;
        self
    }
}

/// Action code → entry. Built once, then handed to the dispatcher read-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionRegistry {
    actions: BTreeMap<u8, Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codes 1..=7 for every kind; only `CreateFlow` carries the fee.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for action in Self::standard_actions() {
            let registered = registry.register(action);
            debug_assert!(registered.is_ok(), "default codes are non-zero and distinct");
        }
        tracing::info!(actions = registry.len(), "standard action registry built");
        registry
    }

    /// Entries of [`ActionRegistry::standard`], in code order.
    pub fn standard_actions() -> impl Iterator<Item = Action> {
        ActionKind::ALL.into_iter().map(|kind| {
            let action = Action::new(kind.default_code(), kind);
            if kind == ActionKind::CreateFlow {
                action.with_fee()
            } else {
                action
            }
        })
    }

    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Result<Self> {
        let mut registry = Self::new();
        for action in actions {
            registry.register(action)?;
        }
        tracing::info!(actions = registry.len(), "action registry built");
        Ok(registry)
    }

    pub fn register(&mut self, action: Action) -> Result<()> {
        if action.code == 0 {
            return Err(MacroError::ActionCodeZeroNotAllowed);
        }
        if self.actions.contains_key(&action.code) {
            return Err(MacroError::DuplicateActionCode(action.code));
        }
        self.actions.insert(action.code, action);
        Ok(())
    }

    pub fn lookup(&self, code: u8) -> Result<&Action> {
        self.actions
            .get(&code)
            .ok_or(MacroError::UnknownActionCode(code))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        let registry = ActionRegistry::standard();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.lookup(1).unwrap().kind, ActionKind::CreateFlow);
        assert!(registry.lookup(1).unwrap().fee_bearing);
        assert_eq!(registry.lookup(7).unwrap().kind, ActionKind::Transfer);
        assert!(registry.iter().filter(|a| a.fee_bearing).count() == 1);
    }

    #[test]
    fn test_standard_entries_pass_validation() {
        let validated = ActionRegistry::from_actions(ActionRegistry::standard_actions()).unwrap();
        assert_eq!(validated, ActionRegistry::standard());
        let codes: Vec<u8> = validated.iter().map(|a| a.code).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_code_zero_rejected() {
        let mut registry = ActionRegistry::new();
        assert_eq!(
            registry.register(Action::new(0, ActionKind::Approve)),
            Err(MacroError::ActionCodeZeroNotAllowed)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let mut registry = ActionRegistry::new();
        registry.register(Action::new(9, ActionKind::Upgrade)).unwrap();
        assert_eq!(
            registry.register(Action::new(9, ActionKind::Downgrade)),
            Err(MacroError::DuplicateActionCode(9))
        );
        // First registration wins.
        assert_eq!(registry.lookup(9).unwrap().kind, ActionKind::Upgrade);
    }

    #[test]
    fn test_unknown_code() {
        let registry = ActionRegistry::standard();
        assert_eq!(registry.lookup(0), Err(MacroError::UnknownActionCode(0)));
        assert_eq!(registry.lookup(42), Err(MacroError::UnknownActionCode(42)));
    }

    #[test]
    fn test_registration_order_is_irrelevant() {
        let forward = ActionRegistry::from_actions([
            Action::new(10, ActionKind::Approve),
            Action::new(20, ActionKind::Transfer).with_fee(),
        ])
        .unwrap();
        let backward = ActionRegistry::from_actions([
            Action::new(20, ActionKind::Transfer).with_fee(),
            Action::new(10, ActionKind::Approve),
        ])
        .unwrap();
        assert_eq!(forward, backward);
    }
}
