//! Verifier input failures.

use std::fmt;

/// Failure to even attempt a verification because an input violates the
/// caller's side of the contract.
///
/// A cryptographically invalid signature is *not* an error: verifiers
/// report it as `Ok(false)` so that callers can always tell a rejection
/// apart from a malformed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum VerifyError {
    /// The public key is neither a 33- nor a 65-byte SEC1 encoding.
    InvalidPublicKey,
    /// The reconstructed client data could not be serialized to JSON.
    InvalidClientData,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Self::InvalidPublicKey => "public key is not a 33- or 65-byte SEC1 encoding",
            Self::InvalidClientData => "client data could not be serialized to JSON",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for VerifyError {}
