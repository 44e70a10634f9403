//! Limits applied to host and token queries.

/// Gas forwarded to each metadata `staticcall`.
pub const QUERY_GAS_CAP: u64 = 200_000;
