//! Clear-signing macro engine for Superfluid batch calls.
//!
//! A relayer submits an envelope `(providedParams, signatureVRS)` on behalf of
//! a user. The engine decodes it, resolves the action code in an
//! [`ActionRegistry`], checks the EIP-712 signature over the human-readable
//! message plus typed parameters, and returns the ordered [`Operation`] batch
//! for the host. Shared by the Stylus contract and the off-chain encoder.

pub mod actions;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod dispatcher;
pub mod eip712;
pub mod errors;
pub mod fee;
pub mod format;
pub mod host;
pub mod operations;
pub mod registry;

pub use actions::{ActionKind, ActionParams, BuildContext};
pub use codec::{Envelope, Language, ProvidedParams, SignatureVrs};
pub use config::{FeeConfig, MacroConfig};
pub use dispatcher::{cfa_agreement_type, MacroDispatcher, VerifiedAction};
pub use eip712::SigningDomain;
pub use errors::{MacroError, Result};
pub use fee::FeeInjector;
pub use host::{HostContext, HostError};
pub use operations::{Operation, OperationType};
pub use registry::{Action, ActionRegistry};
