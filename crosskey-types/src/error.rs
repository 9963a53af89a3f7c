//! Decode failures for the binary payloads handled by this crate.

use std::fmt;

/// Failure to decode an attestation object, a COSE key or a DER signature.
///
/// Decoding is all-or-nothing: there is no meaningful "best effort" public
/// key or signature, so every variant is fatal to the operation that hit it
/// and must be propagated to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The CBOR payload could not be parsed.
    InvalidCbor,
    /// The authenticator data is too short to end in a P-256 COSE key.
    TruncatedAuthenticatorData,
    /// The trailing bytes of the authenticator data are not exactly one
    /// well-formed COSE_Key map.
    InvalidCoseKey,
    /// The COSE key is missing an EC2 coordinate.
    MissingCoordinate,
    /// An EC2 coordinate is present but is not exactly 32 bytes.
    InvalidCoordinateLength,
    /// A persisted public key is not a 65-byte uncompressed SEC1 point.
    InvalidPublicKey,
    /// The signature is not a DER SEQUENCE of two INTEGERs.
    InvalidDerSignature,
    /// A DER INTEGER in the signature does not fit a P-256 scalar.
    IntegerOutOfRange,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Self::InvalidCbor => "malformed CBOR payload",
            Self::TruncatedAuthenticatorData => {
                "authenticator data too short to contain a credential public key"
            }
            Self::InvalidCoseKey => "trailing authenticator data is not a single COSE_Key map",
            Self::MissingCoordinate => "COSE key is missing an EC2 coordinate",
            Self::InvalidCoordinateLength => "EC2 coordinate is not exactly 32 bytes",
            Self::InvalidPublicKey => "public key is not a 65-byte uncompressed SEC1 point",
            Self::InvalidDerSignature => "signature is not a DER SEQUENCE of two INTEGERs",
            Self::IntegerOutOfRange => "DER INTEGER does not fit a P-256 scalar",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for DecodeError {}
