//! Ceremony failures.

use std::fmt;

use crosskey_types::DecodeError;
use crosskey_verifier::VerifyError;

use crate::{authenticator::AuthenticatorError, key_store::StoreError};

/// Errors produced by the registration and authentication ceremonies.
///
/// A verification that merely returns `false` is not represented here; it
/// comes back inside [`VerificationOutcome`](crate::VerificationOutcome).
#[derive(Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// A byte payload from the authenticator could not be decoded.
    Decode(DecodeError),
    /// A verifier rejected its inputs outright.
    Verify(VerifyError),
    /// The returned client data JSON could not be parsed.
    InvalidClientData,
    /// No public key is stored under the credential id.
    CredentialNotFound,
    /// The platform authenticator failed or refused.
    Authenticator(AuthenticatorError),
    /// The key store failed.
    Store(StoreError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "decode failure: {err}"),
            Self::Verify(err) => write!(f, "verification aborted: {err}"),
            Self::InvalidClientData => f.write_str("returned client data is not valid JSON"),
            Self::CredentialNotFound => f.write_str("no key stored for this credential"),
            Self::Authenticator(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl From<DecodeError> for ClientError {
    fn from(err: DecodeError) -> Self {
        ClientError::Decode(err)
    }
}

impl From<VerifyError> for ClientError {
    fn from(err: VerifyError) -> Self {
        ClientError::Verify(err)
    }
}

impl From<AuthenticatorError> for ClientError {
    fn from(err: AuthenticatorError) -> Self {
        ClientError::Authenticator(err)
    }
}

impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        ClientError::Store(err)
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Verify(err) => Some(err),
            Self::Authenticator(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::InvalidClientData | Self::CredentialNotFound => None,
        }
    }
}
