//! # Crosskey Verifier
//!
//! Two independent implementations of the same assertion verification
//! protocol, exposed behind the [`AssertionVerifier`] trait:
//!
//! - [`LocalVerifier`] hashes the client data bytes exactly as they were
//!   received and checks the fixed-width `r‖s` signature produced by this
//!   workspace's own DER conversion.
//! - [`ReferenceVerifier`] reconstructs the client data JSON from its
//!   structured fields and hands the untouched DER signature to p256's own
//!   parser.
//!
//! The two share no conversion or message-assembly code on purpose. Both
//! are run on identical input by the client ceremony; disagreement between
//! their boolean outcomes indicates a protocol bug in one of them, not a
//! forged signature.
//!
//! ## Why RustCrypto?
//!
//! Same reasoning as the rest of this workspace: the pure Rust
//! implementations of the RustCrypto libraries compile to WASM without
//! ceremony, which is where verification ends up running when embedded in
//! a browser shell.

mod error;
mod local;
mod reference;
mod verifier;

use p256::ecdsa::VerifyingKey;

pub use self::{
    error::VerifyError,
    local::LocalVerifier,
    reference::ReferenceVerifier,
    verifier::{AssertionVerifier, RpContext, VerificationRequest},
};

#[cfg(test)]
mod tests;

/// Import a SEC1-encoded P-256 point as an ECDSA verifying key.
///
/// A key of the wrong length is a caller contract violation and errors; a
/// right-sized encoding that is not a valid curve point yields `None`, so
/// verifiers can reject it as an ordinary verification failure rather than
/// propagating an error for what may simply be tampered bytes.
pub(crate) fn verifying_key(sec1: &[u8]) -> Result<Option<VerifyingKey>, VerifyError> {
    if !matches!(sec1.len(), 33 | 65) {
        return Err(VerifyError::InvalidPublicKey);
    }
    Ok(VerifyingKey::from_sec1_bytes(sec1).ok())
}
