use async_trait::async_trait;
use crosskey_types::webauthn::Assertion;
use crosskey_verifier::{AssertionVerifier, VerificationRequest, VerifyError};

use super::*;
use crate::authenticator::{CreateOptions, CreatedCredential, RequestOptions};

const RP_ID: &str = "example.com";
const ORIGIN: &str = "https://example.com";

fn client_with_soft_authenticator() -> Client<SoftAuthenticator, MemoryStore> {
    Client::new(SoftAuthenticator::new(ORIGIN), MemoryStore::new(), RP_ID)
}

#[tokio::test]
async fn register_then_authenticate() {
    let mut client = client_with_soft_authenticator();

    let credential = client.register("wendy").await.expect("failed to register");
    assert_eq!(credential.public_key.as_bytes().len(), 65);
    assert_eq!(credential.public_key.as_bytes()[0], 0x04);

    let outcome = client
        .authenticate(&credential.id)
        .await
        .expect("failed to authenticate");
    assert!(outcome.agreed());
    assert!(outcome.verified());
}

#[tokio::test]
async fn every_attempt_uses_a_fresh_challenge() {
    let mut client = client_with_soft_authenticator();
    let credential = client.register("wendy").await.unwrap();

    for _ in 0..3 {
        let outcome = client.authenticate(&credential.id).await.unwrap();
        assert!(outcome.verified());
    }
}

#[tokio::test]
async fn authenticating_an_unknown_credential_fails() {
    let mut client = client_with_soft_authenticator();
    client.register("wendy").await.unwrap();

    let err = client.authenticate("bm90LWEtY3JlZA").await.unwrap_err();
    assert!(matches!(err, ClientError::CredentialNotFound));
}

/// Wraps an authenticator and flips one bit in every signature it returns.
struct BitFlippingAuthenticator<A>(A);

#[async_trait]
impl<A: AuthenticatorService + Send> AuthenticatorService for BitFlippingAuthenticator<A> {
    async fn create(
        &mut self,
        options: CreateOptions,
    ) -> Result<CreatedCredential, AuthenticatorError> {
        self.0.create(options).await
    }

    async fn get(&mut self, options: RequestOptions) -> Result<Assertion, AuthenticatorError> {
        let mut assertion = self.0.get(options).await?;
        let last = assertion.signature.len() - 1;
        assertion.signature[last] ^= 0x01;
        Ok(assertion)
    }
}

#[tokio::test]
async fn a_tampered_signature_is_rejected_by_both_verifiers() {
    let mut client = Client::new(
        BitFlippingAuthenticator(SoftAuthenticator::new(ORIGIN)),
        MemoryStore::new(),
        RP_ID,
    );
    let credential = client.register("wendy").await.unwrap();

    let outcome = client.authenticate(&credential.id).await.unwrap();
    assert!(outcome.agreed());
    assert!(!outcome.verified());
}

/// A deliberately broken reference verifier, to observe divergence.
struct AlwaysRejects;

impl AssertionVerifier for AlwaysRejects {
    fn verify(&self, _request: &VerificationRequest<'_>) -> Result<bool, VerifyError> {
        Ok(false)
    }
}

#[tokio::test]
async fn a_broken_reference_verifier_shows_up_as_divergence() {
    let mut client = Client::with_reference_verifier(
        SoftAuthenticator::new(ORIGIN),
        MemoryStore::new(),
        AlwaysRejects,
        RP_ID,
    );
    let credential = client.register("wendy").await.unwrap();

    let outcome = client.authenticate(&credential.id).await.unwrap();
    assert!(outcome.local);
    assert!(!outcome.reference);
    assert!(!outcome.agreed());
    assert!(!outcome.verified());
}

#[tokio::test]
async fn registration_persists_the_key_it_returns() {
    let mut client = client_with_soft_authenticator();
    let credential = client.register("wendy").await.unwrap();

    let stored = KeyStore::get(&client.store, &credential.id).await.unwrap().unwrap();
    assert_eq!(stored, credential.public_key);
}
