//! Envelope dispatch: decode → lookup → authenticate → build.
//!
//! The dispatcher holds no per-call state. It reads token metadata from the
//! host to render the signed message but never executes anything; the host
//! runs the returned batch atomically.

use alloy_primitives::{keccak256, Address, FixedBytes};

use crate::{
    actions::{ActionParams, BuildContext},
    codec::{Envelope, Language, ProvidedParams, SignatureVrs},
    config::{FeeConfig, MacroConfig},
    crypto::verify,
    eip712::SigningDomain,
    errors::{MacroError, Result},
    fee::FeeInjector,
    host::HostContext,
    operations::Operation,
    registry::{Action, ActionRegistry},
};

/// Agreement type id of the constant flow agreement, as registered on the host.
pub const CFA_V1_AGREEMENT_ID: &str = "org.superfluid-finance.agreements.ConstantFlowAgreement.v1";

pub fn cfa_agreement_type() -> FixedBytes<32> {
    keccak256(CFA_V1_AGREEMENT_ID.as_bytes())
}

/// An authenticated request, ready to be turned into operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedAction {
    pub action: Action,
    pub params: ActionParams,
    pub digest: FixedBytes<32>,
}

#[derive(Clone, Debug)]
pub struct MacroDispatcher {
    registry: ActionRegistry,
    domain: SigningDomain,
    fee: Option<FeeInjector>,
    ctx: BuildContext,
}

impl MacroDispatcher {
    pub fn new(
        registry: ActionRegistry,
        domain: SigningDomain,
        fee: Option<FeeConfig>,
        ctx: BuildContext,
    ) -> Self {
        Self {
            registry,
            domain,
            fee: fee.map(FeeInjector::new),
            ctx,
        }
    }

    /// Resolve the flow agreement from the host, then build the dispatcher.
    pub fn resolve<H: HostContext + ?Sized>(
        registry: ActionRegistry,
        domain: SigningDomain,
        fee: Option<FeeConfig>,
        host: &H,
    ) -> Result<Self> {
        let cfa = host.agreement_class(cfa_agreement_type())?;
        tracing::info!(%cfa, actions = registry.len(), "macro dispatcher ready");
        Ok(Self::new(registry, domain, fee, BuildContext { cfa }))
    }

    pub fn from_config<H: HostContext + ?Sized>(config: &MacroConfig, host: &H) -> Result<Self> {
        Self::resolve(config.registry()?, config.domain.clone(), config.fee, host)
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn domain(&self) -> &SigningDomain {
        &self.domain
    }

    pub fn fee(&self) -> Option<&FeeConfig> {
        self.fee.as_ref().map(FeeInjector::config)
    }

    pub fn build_context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Decode the envelope and check that `caller` signed it.
    pub fn authenticate<H: HostContext + ?Sized>(
        &self,
        host: &H,
        envelope: &[u8],
        caller: Address,
    ) -> Result<VerifiedAction> {
        let (provided, signature) = Envelope::decode(envelope)?.open()?;
        tracing::debug!(code = provided.action_code, %caller, "envelope decoded");

        let (action, params) = self.resolve_params(&provided)?;
        let digest = params.digest(host, &self.domain, provided.language)?;
        self.check_signature(digest, &signature, caller)?;

        Ok(VerifiedAction {
            action,
            params,
            digest,
        })
    }

    /// Build the batch for a signed envelope submitted on behalf of `caller`.
    pub fn build_batch_operations<H: HostContext + ?Sized>(
        &self,
        host: &H,
        envelope: &[u8],
        caller: Address,
    ) -> Result<Vec<Operation>> {
        let verified = self.authenticate(host, envelope, caller)?;
        let operations = verified.params.build_operations(&self.ctx, caller);

        let batch = match &self.fee {
            Some(fee) if verified.action.fee_bearing => fee.inject(operations),
            _ => operations,
        };
        tracing::debug!(
            kind = %verified.action.kind,
            operations = batch.len(),
            "batch built"
        );
        Ok(batch)
    }

    /// Invariants checked after the host executed the batch. Any error tells
    /// the host to revert the whole batch.
    pub fn post_check<H: HostContext + ?Sized>(
        &self,
        host: &H,
        envelope: &[u8],
        caller: Address,
    ) -> Result<()> {
        let (provided, _signature) = Envelope::decode(envelope)?.open()?;
        let action = *self.registry.lookup(provided.action_code)?;
        let params = ActionParams::decode(action.kind, &provided.action_params)?;
        params.post_check(host, caller)?;

        if let Some(fee) = &self.fee {
            if action.fee_bearing {
                fee.check_settled(host, self.domain.verifying_contract)?;
            }
        }
        Ok(())
    }

    /// Digest a signer must sign for `action_params` under `action_code`.
    pub fn digest_for<H: HostContext + ?Sized>(
        &self,
        host: &H,
        action_code: u8,
        language: Language,
        action_params: &[u8],
    ) -> Result<FixedBytes<32>> {
        let provided = ProvidedParams {
            action_code,
            language,
            action_params: action_params.to_vec().into(),
        };
        let (_, params) = self.resolve_params(&provided)?;
        params.digest(host, &self.domain, language)
    }

    /// Message a signer is shown for `action_params` under `action_code`.
    pub fn message_for<H: HostContext + ?Sized>(
        &self,
        host: &H,
        action_code: u8,
        language: Language,
        action_params: &[u8],
    ) -> Result<String> {
        let provided = ProvidedParams {
            action_code,
            language,
            action_params: action_params.to_vec().into(),
        };
        let (_, params) = self.resolve_params(&provided)?;
        params.message(host, language)
    }

    /// Lookup, language precondition, then typed decode.
    fn resolve_params(&self, provided: &ProvidedParams) -> Result<(Action, ActionParams)> {
        let action = match self.registry.lookup(provided.action_code) {
            Ok(action) => *action,
            Err(err) => {
                tracing::warn!(code = provided.action_code, "unknown action code");
                return Err(err);
            }
        };
        if !provided.language.is_english() {
            tracing::warn!(language = %provided.language, "unsupported language");
            return Err(MacroError::UnsupportedLanguage(provided.language));
        }
        let params = ActionParams::decode(action.kind, &provided.action_params)?;
        Ok((action, params))
    }

    fn check_signature(
        &self,
        digest: FixedBytes<32>,
        signature: &SignatureVrs,
        caller: Address,
    ) -> Result<()> {
        if !verify(digest, signature, caller) {
            tracing::warn!(%caller, %digest, "signature does not match caller");
            return Err(MacroError::InvalidSignature { signer: caller });
        }
        Ok(())
    }
}
