//! Off-chain companion of the Superfluid clear-signing macro: builds
//! `providedParams`, renders the message and digest a wallet signs, and seals
//! signed envelopes for relayers.

pub mod encoder;
pub mod logging;
pub mod tokens;
pub mod types;
