//! # Crosskey Client
//!
//! The ceremonies that tie the pieces together: registering a credential
//! (decode the attestation object, persist the public key) and
//! authenticating against it (issue a fresh challenge, collect an
//! assertion, and verify it with two independent implementations of the
//! same protocol whose boolean outcomes must agree).
//!
//! The platform authenticator and the key store are injected capabilities
//! ([`AuthenticatorService`], [`KeyStore`]), so the ceremonies run the same
//! against real platform plumbing or against the in-memory fakes used in
//! tests.

use std::time::Duration;

use crosskey_types::{attestation, crypto::sha256, rand::random_vec, RawPublicKey};
use crosskey_verifier::{
    AssertionVerifier, LocalVerifier, ReferenceVerifier, RpContext, VerificationRequest,
};

mod authenticator;
mod error;
mod key_store;

#[cfg(any(feature = "testable", test))]
mod soft;

#[cfg(test)]
mod tests;

pub use self::{
    authenticator::{
        AuthenticatorError, AuthenticatorService, CreateOptions, CreatedCredential,
        RequestOptions, DEFAULT_TIMEOUT,
    },
    error::ClientError,
    key_store::{KeyStore, MemoryStore, StoreError},
};

#[cfg(any(feature = "testable", test))]
pub use self::soft::SoftAuthenticator;

/// A registered credential: its id and the public key that was decoded out
/// of the attestation object and persisted.
#[derive(Debug, Clone)]
pub struct RegisteredCredential {
    /// Credential id, base64url encoded.
    pub id: String,
    /// The decoded 65-byte public key.
    pub public_key: RawPublicKey,
}

/// The two independently computed verification booleans of one attempt.
///
/// For any valid input the two are expected to be equal; divergence
/// indicates a protocol bug in one of the verifier implementations and is
/// logged at error level by [`Client::authenticate`], but it is still a
/// normal value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// Outcome of the in-process verifier.
    pub local: bool,
    /// Outcome of the independent reference verifier.
    pub reference: bool,
}

impl VerificationOutcome {
    /// Did both implementations reach the same boolean?
    pub fn agreed(self) -> bool {
        self.local == self.reference
    }

    /// Did the assertion verify? True only when both implementations agree
    /// that it did.
    pub fn verified(self) -> bool {
        self.local && self.reference
    }
}

/// Runs webauthn ceremonies against an injected authenticator, key store
/// and reference verifier.
///
/// The in-process [`LocalVerifier`] is always run; the reference verifier
/// is any second [`AssertionVerifier`] (by default the workspace's own
/// [`ReferenceVerifier`], but a caller can inject a remote or wasm-hosted
/// implementation instead).
pub struct Client<A, S, R = ReferenceVerifier> {
    authenticator: A,
    store: S,
    reference: R,
    rp_id: String,
    rp_name: String,
    timeout: Duration,
}

impl<A, S> Client<A, S>
where
    A: AuthenticatorService,
    S: KeyStore,
{
    /// Create a client for the given RP ID using the built-in reference
    /// verifier.
    pub fn new(authenticator: A, store: S, rp_id: impl Into<String>) -> Self {
        Self::with_reference_verifier(authenticator, store, ReferenceVerifier, rp_id)
    }
}

impl<A, S, R> Client<A, S, R>
where
    A: AuthenticatorService,
    S: KeyStore,
    R: AssertionVerifier,
{
    /// Create a client that cross-checks against a caller-supplied
    /// reference verifier.
    pub fn with_reference_verifier(
        authenticator: A,
        store: S,
        reference: R,
        rp_id: impl Into<String>,
    ) -> Self {
        let rp_id = rp_id.into();
        Self {
            authenticator,
            store,
            reference,
            rp_name: rp_id.clone(),
            rp_id,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the human-friendly Relying Party name shown in prompts.
    pub fn rp_name(mut self, rp_name: impl Into<String>) -> Self {
        self.rp_name = rp_name.into();
        self
    }

    /// Override the authenticator prompt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register a new credential for `user_name`.
    ///
    /// Asks the authenticator to create a key pair, decodes the credential
    /// public key out of the returned attestation object and persists it
    /// under the credential id. The decode is all-or-nothing: a malformed
    /// attestation object fails the ceremony and nothing is stored.
    pub async fn register(&mut self, user_name: &str) -> Result<RegisteredCredential, ClientError> {
        let options = CreateOptions {
            rp_id: self.rp_id.clone(),
            rp_name: self.rp_name.clone(),
            user_name: user_name.to_owned(),
            user_id: random_vec(32).into(),
            challenge: random_vec(32).into(),
            timeout: self.timeout,
        };

        let created = self.authenticator.create(options).await?;
        let public_key = attestation::decode_public_key(&created.attestation_object)?;
        self.store.put(&created.id, public_key.clone()).await?;
        log::debug!("registered credential {} for {user_name}", created.id);

        Ok(RegisteredCredential {
            id: created.id,
            public_key,
        })
    }

    /// Authenticate against a previously registered credential.
    ///
    /// Issues a fresh random challenge, requests an assertion over its
    /// digest, then runs both verifier implementations on the identical
    /// request and returns their two booleans. No state survives the
    /// attempt; every call starts from a new challenge.
    pub async fn authenticate(
        &mut self,
        credential_id: &str,
    ) -> Result<VerificationOutcome, ClientError> {
        let challenge = random_vec(32);

        // the authenticator is handed the digest of the challenge, so the
        // client data ends up carrying base64url(sha256(challenge))
        let options = RequestOptions {
            rp_id: self.rp_id.clone(),
            challenge: sha256(&challenge).to_vec().into(),
            timeout: self.timeout,
        };
        let assertion = self.authenticator.get(options).await?;

        let public_key = self
            .store
            .get(credential_id)
            .await?
            .ok_or(ClientError::CredentialNotFound)?;

        // the rp context the verifiers check against comes from the client
        // data the platform actually returned, not from our own config
        let client_data: crosskey_types::webauthn::CollectedClientData =
            serde_json::from_slice(&assertion.client_data_json)
                .map_err(|_| ClientError::InvalidClientData)?;
        let rp = RpContext {
            origin: client_data.origin,
            cross_origin: client_data.cross_origin.unwrap_or(false),
        };

        let request = VerificationRequest {
            challenge: &challenge,
            rp: &rp,
            public_key: public_key.as_bytes(),
            assertion: &assertion,
        };
        let outcome = VerificationOutcome {
            local: LocalVerifier.verify(&request)?,
            reference: self.reference.verify(&request)?,
        };

        if !outcome.agreed() {
            log::error!(
                "verifier divergence for credential {credential_id}: local={} reference={}",
                outcome.local,
                outcome.reference,
            );
        } else if !outcome.verified() {
            log::debug!("assertion for credential {credential_id} did not verify");
        }

        Ok(outcome)
    }
}
