//! # Crosskey
//!
//! Crosskey registers a public-key credential against a platform
//! authenticator (webauthn / FIDO2 style) and verifies assertions with two
//! *independent* implementations of the same ECDSA P-256 verification
//! protocol, cross-checking their boolean outcomes against each other. It
//! is comprised of three sub-libraries:
//!
//! - `crosskey-types` — usable as [`types`]: the payload types and the two
//!   binary codecs, extracting a raw public key from a CBOR attestation
//!   object and converting a DER ECDSA signature to fixed-width `r‖s` form.
//! - `crosskey-verifier` — usable as [`verifier`]: the
//!   [`AssertionVerifier`](verifier::AssertionVerifier) capability and its
//!   two implementations.
//! - `crosskey-client` — usable as [`client`]: the registration and
//!   authentication ceremonies over an injected authenticator and key
//!   store.
//!
//! You can think of one authentication attempt as a short pipeline invoked
//! twice on identical input:
//!
//! challenge → [`AuthenticatorService`](client::AuthenticatorService) →
//! assertion bytes → [`LocalVerifier`](verifier::LocalVerifier) *and*
//! [`ReferenceVerifier`](verifier::ReferenceVerifier) →
//! [`VerificationOutcome`](client::VerificationOutcome)
//!
//! The two verifiers deliberately share no message-assembly or signature
//! conversion code. One hashes the client data bytes exactly as returned
//! and checks the raw `r‖s` produced by this workspace's own DER codec;
//! the other rebuilds the client data JSON from structured fields and
//! trusts p256's own DER parser. A divergence between their outcomes
//! means a protocol bug, and the client logs it as such — it is never
//! confused with an ordinary failed verification.
//!
//! A runnable demonstration lives in `crosskey/examples/usage.rs`.
//!
//! ## Example: registering and authenticating
//!
//! ```
//! use crosskey::client::{Client, MemoryStore, SoftAuthenticator};
//!
//! # async fn run() -> Result<(), crosskey::client::ClientError> {
//! let authenticator = SoftAuthenticator::new("https://future.example.com");
//! let mut client = Client::new(authenticator, MemoryStore::new(), "future.example.com");
//!
//! let credential = client.register("wendy").await?;
//! let outcome = client.authenticate(&credential.id).await?;
//!
//! assert!(outcome.agreed());
//! assert!(outcome.verified());
//! # Ok(())
//! # }
//! # tokio_test::block_on(run()).unwrap();
//! ```

/// Ceremonies over the injected authenticator and key store.
pub use crosskey_client as client;
/// Payload types and binary codecs.
pub use crosskey_types as types;
/// The cross-checked verifier implementations.
pub use crosskey_verifier as verifier;
