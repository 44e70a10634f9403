//! Superfluid host and token ABI surface used by the macro.

pub mod constants;
pub mod interfaces;
