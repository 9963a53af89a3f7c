//! The boundary to the platform authenticator.
//!
//! The authenticator is an opaque external service: this crate only ever
//! consumes the byte payloads it returns, never its transport. Modeling it
//! as a trait lets the ceremonies run against controlled fakes in tests
//! without any hardware-bound secure element.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use crosskey_types::{webauthn::Assertion, Bytes};

/// How long a credential prompt may wait on the user before it is
/// abandoned, unless the caller overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Options governing credential creation.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// The RP ID (domain) the credential will be scoped to.
    pub rp_id: String,
    /// A human-friendly name for the Relying Party.
    pub rp_name: String,
    /// The name of the account the credential belongs to.
    pub user_name: String,
    /// The RP-specific user handle.
    pub user_id: Bytes,
    /// The authenticator-facing challenge.
    pub challenge: Bytes,
    /// Prompt timeout.
    pub timeout: Duration,
}

/// Options governing an assertion request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// The RP ID the credential was scoped to.
    pub rp_id: String,
    /// The authenticator-facing challenge to be signed.
    pub challenge: Bytes,
    /// Prompt timeout.
    pub timeout: Duration,
}

/// A freshly created credential: its id and the CBOR attestation object
/// whose authenticator data embeds the credential public key.
#[derive(Debug, Clone)]
pub struct CreatedCredential {
    /// Credential id, base64url encoded.
    pub id: String,
    /// The raw attestation object bytes.
    pub attestation_object: Bytes,
}

/// Failures surfaced by the platform authenticator boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthenticatorError {
    /// The user dismissed the prompt or it timed out.
    NotAllowed,
    /// No credential known to the authenticator matched the request.
    NoCredentials,
    /// Any other platform failure, with its message.
    Platform(String),
}

impl fmt::Display for AuthenticatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotAllowed => f.write_str("the authenticator prompt was dismissed or timed out"),
            Self::NoCredentials => f.write_str("no matching credential on the authenticator"),
            Self::Platform(msg) => write!(f, "platform authenticator failure: {msg}"),
        }
    }
}

impl std::error::Error for AuthenticatorError {}

/// The platform credential service, in the shape of
/// `navigator.credentials`: create a key pair, or sign a challenge with
/// one. Private keys never cross this boundary.
#[async_trait]
pub trait AuthenticatorService {
    /// Create a credential; the private key stays behind the boundary.
    async fn create(&mut self, options: CreateOptions)
        -> Result<CreatedCredential, AuthenticatorError>;

    /// Ask the authenticator to sign the challenge with an existing
    /// credential, returning the assertion byte payloads.
    async fn get(&mut self, options: RequestOptions) -> Result<Assertion, AuthenticatorError>;
}
