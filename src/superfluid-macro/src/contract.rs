//! Stylus entrypoint of the clear-signing macro.
//!
//! Implements the host's user-defined macro surface (`buildBatchOperations`,
//! `postCheck`) plus signer-facing queries (`getDigest`, `getMessage`,
//! `encodeParams`).
//!
//! Design notes:
//! - The macro is stateless per call. Storage holds the owner set at
//!   deployment and the one-shot configuration written by `initialize`: the
//!   host, its flow agreement and the fee. The registry is the standard one.
//! - The signing domain is bound to this deployment: `chainId` and
//!   `verifyingContract` come from the VM.
//! - Every token read is a gas-capped `staticcall` through [`OnchainHost`].

use alloc::{string::String, vec::Vec};

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    prelude::*,
};
use superfluid_macro_core::{
    cfa_agreement_type, ActionRegistry, BuildContext, FeeConfig, HostContext, Language,
    MacroDispatcher, MacroError, ProvidedParams, SigningDomain,
};

use crate::{
    errors::{AlreadyInitialized, MacroRevert, NotInitialized, NotOwner, UnknownHost},
    host::onchain::OnchainHost,
    superfluid::constants::QUERY_GAS_CAP,
};

sol_storage! {
    #[entrypoint]
    pub struct SuperfluidMacro {
        /// Only account allowed to call `initialize`.
        address owner;

        /// Set once by `initialize`.
        bool initialized;
        address host;
        /// Constant flow agreement resolved from `host` at initialization.
        address cfa;

        /// Fee forwarded on fee-bearing actions. A zero receiver disables the fee.
        address fee_receiver;
        uint256 fee_amount;
    }
}

#[public]
impl SuperfluidMacro {
    #[constructor]
    pub fn constructor(&mut self, owner: Address) {
        self.owner.set(owner);
    }

    /// One-shot configuration, owner only. Binds the macro to `host` and
    /// resolves its flow agreement. Pass a zero `fee_receiver` to run without
    /// a fee.
    pub fn initialize(
        &mut self,
        host: Address,
        fee_receiver: Address,
        fee_amount: U256,
    ) -> Result<(), MacroRevert> {
        let caller = self.vm().msg_sender();
        if caller != self.owner.get() {
            return Err(MacroRevert::NotOwner(NotOwner { caller }));
        }
        if self.initialized.get() {
            return Err(MacroRevert::AlreadyInitialized(AlreadyInitialized {}));
        }
        let cfa = self
            ._onchain_host(host)
            .agreement_class(cfa_agreement_type())
            .map_err(MacroError::from)?;
        self.host.set(host);
        self.cfa.set(cfa);
        self.fee_receiver.set(fee_receiver);
        self.fee_amount.set(fee_amount);
        self.initialized.set(true);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    pub fn owner(&self) -> Address {
        self.owner.get()
    }

    /// `(host, cfa)` bound at initialization.
    pub fn superfluid(&self) -> (Address, Address) {
        (self.host.get(), self.cfa.get())
    }

    /// `(receiver, amount)`; the receiver is zero when no fee is charged.
    pub fn fee(&self) -> (Address, U256) {
        (self.fee_receiver.get(), self.fee_amount.get())
    }

    /// `IUserDefinedMacro.buildBatchOperations`.
    ///
    /// Operations are returned as `(operationType, target, data)` tuples, the
    /// ABI shape of `ISuperfluid.Operation`.
    pub fn build_batch_operations(
        &self,
        host: Address,
        params: Bytes,
        msg_sender: Address,
    ) -> Result<Vec<(u32, Address, Bytes)>, MacroRevert> {
        let dispatcher = self._dispatcher(host)?;
        let onchain = self._onchain_host(host);
        let operations = dispatcher.build_batch_operations(&onchain, &params[..], msg_sender)?;
        Ok(operations
            .into_iter()
            .map(|op| {
                let (kind, target, data) = op.into_abi_tuple();
                (kind, target, Bytes::from(data.to_vec()))
            })
            .collect())
    }

    /// `IUserDefinedMacro.postCheck`: reverts the whole batch when any
    /// post-execution invariant fails.
    pub fn post_check(
        &self,
        host: Address,
        params: Bytes,
        msg_sender: Address,
    ) -> Result<(), MacroRevert> {
        let dispatcher = self._dispatcher(host)?;
        let onchain = self._onchain_host(host);
        dispatcher.post_check(&onchain, &params[..], msg_sender)?;
        Ok(())
    }

    /// EIP-712 digest the user must sign for `action_params` under `action_code`.
    pub fn get_digest(
        &self,
        host: Address,
        action_code: u8,
        lang: FixedBytes<32>,
        action_params: Bytes,
    ) -> Result<FixedBytes<32>, MacroRevert> {
        let dispatcher = self._dispatcher(host)?;
        let onchain = self._onchain_host(host);
        Ok(dispatcher.digest_for(&onchain, action_code, Language(lang), &action_params[..])?)
    }

    /// Human-readable sentence shown to the user for the same inputs.
    pub fn get_message(
        &self,
        host: Address,
        action_code: u8,
        lang: FixedBytes<32>,
        action_params: Bytes,
    ) -> Result<String, MacroRevert> {
        let dispatcher = self._dispatcher(host)?;
        let onchain = self._onchain_host(host);
        Ok(dispatcher.message_for(&onchain, action_code, Language(lang), &action_params[..])?)
    }

    /// `abi.encode(uint8 actionCode, bytes32 lang, bytes actionParams)`.
    pub fn encode_params(&self, action_code: u8, lang: FixedBytes<32>, action_params: Bytes) -> Bytes {
        let provided = ProvidedParams {
            action_code,
            language: Language(lang),
            action_params: action_params[..].to_vec().into(),
        };
        Bytes::from(provided.encode())
    }
}

impl SuperfluidMacro {
    fn _onchain_host(&self, host: Address) -> OnchainHost {
        let this = self.vm().contract_address();
        OnchainHost::new(host, QUERY_GAS_CAP, (this, self.vm().balance(this)))
    }

    fn _domain(&self) -> SigningDomain {
        SigningDomain::new(self.vm().chain_id(), self.vm().contract_address())
    }

    fn _fee(&self) -> Option<FeeConfig> {
        let receiver = self.fee_receiver.get();
        if receiver == Address::ZERO {
            return None;
        }
        Some(FeeConfig {
            receiver,
            amount: self.fee_amount.get(),
        })
    }

    fn _dispatcher(&self, host: Address) -> Result<MacroDispatcher, MacroRevert> {
        if !self.initialized.get() {
            return Err(MacroRevert::NotInitialized(NotInitialized {}));
        }
        if host != self.host.get() {
            return Err(MacroRevert::UnknownHost(UnknownHost { host }));
        }
        Ok(MacroDispatcher::new(
            ActionRegistry::standard(),
            self._domain(),
            self._fee(),
            BuildContext {
                cfa: self.cfa.get(),
            },
        ))
    }
}
