//! Wire codec for envelopes, provided params and signatures.
//!
//! Layouts (Solidity `abi.encode`, no selector):
//! - envelope: `(bytes providedParams, bytes signatureVRS)`
//! - provided params: `(uint8 actionCode, bytes32 language, bytes actionParams)`
//! - signature: `(uint8 v, bytes32 r, bytes32 s)`, or packed `r || s || v` (65 bytes)

use core::{fmt, str::FromStr};

use alloy_primitives::{Bytes, FixedBytes};
use alloy_sol_types::{sol_data, SolType, SolValue};

type ProvidedParamsTuple = (sol_data::Uint<8>, sol_data::FixedBytes<32>, sol_data::Bytes);
type SignatureTuple = (sol_data::Uint<8>, sol_data::FixedBytes<32>, sol_data::FixedBytes<32>);

use crate::errors::{MacroError, Result};

/// Left-aligned ASCII language tag padded with zeros to 32 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Language(pub FixedBytes<32>);

impl Language {
    pub const EN: Language = Language(FixedBytes::new(tag_bytes(b"en")));

    /// `None` for tags longer than 32 bytes.
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag.len() > 32 {
            return None;
        }
        let mut buf = [0u8; 32];
        buf[..tag.len()].copy_from_slice(tag.as_bytes());
        Some(Language(FixedBytes(buf)))
    }

    pub fn is_english(&self) -> bool {
        *self == Self::EN
    }
}

const fn tag_bytes(tag: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < tag.len() && i < 32 {
        out[i] = tag[i];
        i += 1;
    }
    out
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.0.as_slice();
        let end = raw.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        match core::str::from_utf8(&raw[..end]) {
            Ok(s) => write!(f, "{s:?}"),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for Language {
    type Err = MacroError;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_tag(s).ok_or(MacroError::MalformedPayload("language tag longer than 32 bytes"))
    }
}

/// Decoded `providedParams`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvidedParams {
    pub action_code: u8,
    pub language: Language,
    pub action_params: Bytes,
}

impl ProvidedParams {
    pub fn encode(&self) -> Vec<u8> {
        ProvidedParamsTuple::abi_encode_params(&(
            self.action_code,
            self.language.0,
            self.action_params.clone(),
        ))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (action_code, language, action_params) =
            ProvidedParamsTuple::abi_decode_params(bytes, true)
                .map_err(|_| MacroError::MalformedPayload("provided params"))?;
        Ok(Self {
            action_code,
            language: Language(language),
            action_params,
        })
    }
}

/// Recoverable secp256k1 signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureVrs {
    pub v: u8,
    pub r: FixedBytes<32>,
    pub s: FixedBytes<32>,
}

impl SignatureVrs {
    pub fn encode(&self) -> Vec<u8> {
        SignatureTuple::abi_encode_params(&(self.v, self.r, self.s))
    }

    /// Accepts the ABI tuple or the 65-byte packed `r || s || v` form.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() == 65 {
            let mut packed = [0u8; 65];
            packed.copy_from_slice(bytes);
            return Ok(Self::from_packed(&packed));
        }
        let (v, r, s) = SignatureTuple::abi_decode_params(bytes, true)
            .map_err(|_| MacroError::MalformedPayload("signature"))?;
        Ok(Self { v, r, s })
    }

    pub fn from_packed(sig: &[u8; 65]) -> Self {
        Self {
            r: FixedBytes::from_slice(&sig[0..32]),
            s: FixedBytes::from_slice(&sig[32..64]),
            v: sig[64],
        }
    }

    pub fn to_packed(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }
}

/// Signed payload submitted by a relayer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub provided_params: Bytes,
    pub signature: Bytes,
}

impl Envelope {
    pub fn seal(provided: &ProvidedParams, signature: &SignatureVrs) -> Self {
        Self {
            provided_params: provided.encode().into(),
            signature: signature.encode().into(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        (self.provided_params.clone(), self.signature.clone()).abi_encode_params()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (provided_params, signature) = <(Bytes, Bytes)>::abi_decode_params(bytes, true)
            .map_err(|_| MacroError::MalformedPayload("envelope"))?;
        Ok(Self {
            provided_params,
            signature,
        })
    }

    /// Decode both inner payloads.
    pub fn open(&self) -> Result<(ProvidedParams, SignatureVrs)> {
        Ok((
            ProvidedParams::decode(&self.provided_params)?,
            SignatureVrs::decode(&self.signature)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_tag_layout() {
        let en = Language::EN;
        assert_eq!(&en.0[..2], b"en");
        assert!(en.0[2..].iter().all(|b| *b == 0));
        assert_eq!(Language::from_tag("en"), Some(Language::EN));
        assert!(Language::from_tag("fr").is_some_and(|l| !l.is_english()));
        assert_eq!(Language::EN.to_string(), "\"en\"");
    }

    #[test]
    fn test_provided_params_layout() {
        let provided = ProvidedParams {
            action_code: 3,
            language: Language::EN,
            action_params: Bytes::from(vec![0xab; 40]),
        };
        let encoded = provided.encode();
        // code word + language word + offset word + length word + 2 padded data words
        assert_eq!(encoded.len(), 32 * 6);
        assert_eq!(encoded[31], 3);
        assert_eq!(ProvidedParams::decode(&encoded).unwrap(), provided);
    }

    #[test]
    fn test_truncated_provided_params_rejected() {
        let provided = ProvidedParams {
            action_code: 1,
            language: Language::EN,
            action_params: Bytes::from(vec![1, 2, 3]),
        };
        let encoded = provided.encode();
        let err = ProvidedParams::decode(&encoded[..encoded.len() - 32]).unwrap_err();
        assert!(matches!(err, MacroError::MalformedPayload(_)));
    }

    #[test]
    fn test_signature_forms() {
        let sig = SignatureVrs {
            v: 28,
            r: FixedBytes::repeat_byte(0x11),
            s: FixedBytes::repeat_byte(0x22),
        };
        assert_eq!(sig.encode().len(), 96);
        assert_eq!(SignatureVrs::decode(&sig.encode()).unwrap(), sig);
        assert_eq!(SignatureVrs::decode(&sig.to_packed()).unwrap(), sig);
        assert!(SignatureVrs::decode(&[0u8; 64]).is_err());
    }

    #[test]
    fn test_envelope_open() {
        let provided = ProvidedParams {
            action_code: 7,
            language: Language::EN,
            action_params: Bytes::from(vec![9u8; 96]),
        };
        let sig = SignatureVrs {
            v: 27,
            r: FixedBytes::repeat_byte(1),
            s: FixedBytes::repeat_byte(2),
        };
        let envelope = Envelope::seal(&provided, &sig);
        let decoded = Envelope::decode(&envelope.encode()).unwrap();
        assert_eq!(decoded, envelope);
        assert_eq!(decoded.open().unwrap(), (provided, sig));
        assert!(Envelope::decode(&[0u8; 31]).is_err());
    }

    #[test]
    fn test_action_code_word_must_fit_uint8() {
        let provided = ProvidedParams {
            action_code: 1,
            language: Language::EN,
            action_params: Bytes::from(vec![0xab; 3]),
        };
        let mut bytes = provided.encode();
        assert_eq!(ProvidedParams::decode(&bytes).unwrap(), provided);

        // Code 0x0101 in the first word.
        bytes[30] = 0x01;
        assert_eq!(
            ProvidedParams::decode(&bytes),
            Err(MacroError::MalformedPayload("provided params"))
        );
    }
}
