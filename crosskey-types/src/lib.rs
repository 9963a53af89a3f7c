//! # Crosskey Types
//!
//! Type definitions and binary codecs shared by the `crosskey` libraries:
//! the webauthn attestation and assertion payloads, the extraction of a raw
//! P-256 public key out of an attestation object, and the conversion of an
//! ASN.1 DER ECDSA signature into its fixed-width raw form.
//!
//! Everything in this crate is a pure transformation over byte buffers;
//! nothing here talks to an authenticator or performs a signature check.

mod utils;

pub mod attestation;
pub mod error;
pub mod key;
pub mod signature;
pub mod webauthn;

// Re-exports
pub use utils::{
    bytes::{Bytes, NotBase64Encoded},
    crypto, encoding, rand,
};

pub use self::{error::DecodeError, key::RawPublicKey, signature::RawSignature};
