//! The shared verification capability both implementations sit behind.

use crosskey_types::webauthn::Assertion;

use crate::VerifyError;

/// The relying-party context an assertion's client data was collected
/// under, as parsed back out of the returned client data JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpContext {
    /// Fully qualified origin of the requester.
    pub origin: String,
    /// Whether the request was made cross-origin.
    pub cross_origin: bool,
}

/// Everything a verifier needs to check one assertion.
///
/// Each verification attempt builds a fresh request; nothing is retained
/// across attempts and concurrent attempts share no buffers.
#[derive(Debug, Clone, Copy)]
pub struct VerificationRequest<'a> {
    /// The application-level challenge the assertion was requested for.
    /// The authenticator-facing challenge is its SHA-256 digest.
    pub challenge: &'a [u8],

    /// Relying-party context.
    pub rp: &'a RpContext,

    /// The registered credential public key, SEC1 encoded (65 bytes
    /// uncompressed, or 33 compressed).
    pub public_key: &'a [u8],

    /// The byte payloads the authenticator returned.
    pub assertion: &'a Assertion,
}

/// One implementation of the assertion verification protocol.
///
/// Implementations must be pure: same request in, same outcome out, with
/// no side effect beyond the returned boolean. `Ok(false)` means the
/// signature did not verify; errors are reserved for requests whose inputs
/// violate the caller contract (see [`VerifyError`]).
pub trait AssertionVerifier {
    /// Check the assertion against the credential public key.
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<bool, VerifyError>;
}

impl<V: AssertionVerifier + ?Sized> AssertionVerifier for &V {
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<bool, VerifyError> {
        (**self).verify(request)
    }
}

impl<V: AssertionVerifier + ?Sized> AssertionVerifier for Box<V> {
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<bool, VerifyError> {
        (**self).verify(request)
    }
}
