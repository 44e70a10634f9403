use alloy_primitives::{Address, FixedBytes};
use anyhow::{anyhow, Context, Result};
use k256::ecdsa::SigningKey;
use serde::Serialize;
use superfluid_macro_core::{
    crypto::address_of, ActionKind, ActionParams, Envelope, HostContext, Language,
    MacroDispatcher, ProvidedParams, SignatureVrs,
};

use crate::types::ActionRequest;

/// What the signer sees and signs for one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub action_code: u8,
    pub kind: ActionKind,
    pub message: String,
    pub digest: FixedBytes<32>,
    /// Hex `providedParams`, ready to seal.
    pub provided_params: String,
}

/// Decoded view of a sealed envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeReport {
    pub action_code: u8,
    pub language: String,
    /// Kind under the standard codes.
    pub kind: Option<ActionKind>,
    pub action_params: String,
    pub v: u8,
    pub r: FixedBytes<32>,
    pub s: FixedBytes<32>,
    /// Present when the envelope was checked against a dispatcher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer: Option<Address>,
}

/// Parse a hex secp256k1 secret key, with or without `0x`.
pub fn parse_signing_key(hex_key: &str) -> Result<SigningKey> {
    let raw = hex::decode(hex_key.trim().trim_start_matches("0x"))
        .context("signing key is not valid hex")?;
    SigningKey::from_slice(&raw).map_err(|_| anyhow!("signing key is not a valid secp256k1 scalar"))
}

pub fn signer_address(key: &SigningKey) -> Address {
    address_of(key.verifying_key())
}

/// `abi.encode(uint8 actionCode, bytes32 lang, bytes actionParams)` for `request`.
pub fn encode_provided_params(request: &ActionRequest) -> Result<Vec<u8>> {
    let params = request.action.to_params()?;
    Ok(params.encode_provided(request.action_code(), request.language()?))
}

/// Render the message and digest exactly as the contract will.
pub fn preview<H: HostContext + ?Sized>(
    dispatcher: &MacroDispatcher,
    host: &H,
    request: &ActionRequest,
) -> Result<Preview> {
    let params: ActionParams = request.action.to_params()?;
    let code = request.action_code();
    let language = request.language()?;
    let action_params = params.encode();

    let message = dispatcher
        .message_for(host, code, language, &action_params)
        .context("failed to render message")?;
    let digest = dispatcher
        .digest_for(host, code, language, &action_params)
        .context("failed to compute digest")?;
    tracing::debug!(code, %digest, "digest computed");

    Ok(Preview {
        action_code: code,
        kind: params.kind(),
        message,
        digest,
        provided_params: format!("0x{}", hex::encode(params.encode_provided(code, language))),
    })
}

/// Sign a 32-byte digest; `v` is 27 or 28.
pub fn sign_digest(key: &SigningKey, digest: FixedBytes<32>) -> Result<SignatureVrs> {
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(digest.as_slice())
        .map_err(|err| anyhow!("signing failed: {err}"))?;
    let rs = signature.to_bytes();
    Ok(SignatureVrs {
        v: 27 + recovery_id.to_byte(),
        r: FixedBytes::from_slice(&rs[..32]),
        s: FixedBytes::from_slice(&rs[32..]),
    })
}

/// Preview, sign and seal `request` into an envelope the relayer can submit.
pub fn sign_request<H: HostContext + ?Sized>(
    dispatcher: &MacroDispatcher,
    host: &H,
    request: &ActionRequest,
    key: &SigningKey,
) -> Result<(Preview, Vec<u8>)> {
    let preview = preview(dispatcher, host, request)?;
    let signature = sign_digest(key, preview.digest)?;
    let provided = ProvidedParams {
        action_code: preview.action_code,
        language: request.language()?,
        action_params: request.action.to_params()?.encode().into(),
    };
    let envelope = Envelope::seal(&provided, &signature).encode();
    tracing::info!(
        kind = %preview.kind,
        signer = %signer_address(key),
        bytes = envelope.len(),
        "envelope sealed"
    );
    Ok((preview, envelope))
}

/// Decode an envelope. With a dispatcher and a caller, also authenticate it.
pub fn inspect_envelope<H: HostContext + ?Sized>(
    envelope: &[u8],
    check: Option<(&MacroDispatcher, &H, Address)>,
) -> Result<EnvelopeReport> {
    let (provided, signature) = Envelope::decode(envelope)?.open()?;
    let kind = ActionKind::try_from(provided.action_code).ok();

    let signer = match check {
        Some((dispatcher, host, caller)) => {
            dispatcher
                .authenticate(host, envelope, caller)
                .context("envelope does not authenticate")?;
            Some(caller)
        }
        None => None,
    };

    Ok(EnvelopeReport {
        action_code: provided.action_code,
        language: language_tag(&provided.language),
        kind,
        action_params: format!("0x{}", hex::encode(&provided.action_params)),
        v: signature.v,
        r: signature.r,
        s: signature.s,
        signer,
    })
}

fn language_tag(language: &Language) -> String {
    let raw = language.0.as_slice();
    let end = raw.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Parse hex input, with or without `0x`.
pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    hex::decode(input.trim().trim_start_matches("0x")).context("input is not valid hex")
}
