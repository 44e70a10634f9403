//! Signer recovery for clear-signed envelopes.
//!
//! Purpose: prove that the end user, not the relayer, authorised the action.
//! Recovery runs in pure Rust (secp256k1 via `k256`) so the same code backs the
//! contract and the off-chain tooling.

use alloy_primitives::{Address, FixedBytes};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

use crate::codec::SignatureVrs;

/// Recover an EOA address from a 32-byte digest and a `(v, r, s)` signature.
///
/// Notes:
/// - We accept v in {0,1,27,28}; anything else is rejected.
/// - High-s signatures are rejected by `k256` during recovery.
pub fn recover_signer(digest: FixedBytes<32>, sig: &SignatureVrs) -> Result<Address, ()> {
    let parity = match sig.v {
        27 | 28 => sig.v - 27,
        0 | 1 => sig.v,
        _ => return Err(()),
    };
    let recovery_id = RecoveryId::from_byte(parity).ok_or(())?;

    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(sig.r.as_slice());
    rs[32..].copy_from_slice(sig.s.as_slice());
    let signature = Signature::from_slice(&rs).map_err(|_| ())?;

    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
        .map_err(|_| ())?;
    Ok(address_of(&key))
}

/// `true` iff `sig` over `digest` recovers to `claimed`. Never errors.
pub fn verify(digest: FixedBytes<32>, sig: &SignatureVrs, claimed: Address) -> bool {
    matches!(recover_signer(digest, sig), Ok(signer) if signer == claimed)
}

/// Ethereum address: low 20 bytes of keccak256 over the uncompressed point
/// without its 0x04 prefix.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..32])
}
