//! Superfluid clear-signing macro for Arbitrum Stylus.
//!
//! The host (`ISuperfluid.batchCall` via its macro forwarder) calls
//! `buildBatchOperations` with a signed envelope and executes the returned
//! operations atomically, then calls `postCheck`. All decoding, signature
//! checks and batch building live in `superfluid-macro-core`.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

pub mod contract;
pub mod errors;
pub mod host;
pub mod superfluid;

pub use contract::SuperfluidMacro;
