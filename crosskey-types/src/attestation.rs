//! Binary structures produced by the authenticator at credential creation,
//! and the extraction of the credential public key out of them.
//!
//! The encode side ([`AuthenticatorData::to_vec`]) exists so that software
//! authenticators and test fixtures can fabricate byte-exact payloads; the
//! decode side ([`decode_public_key`]) is what the registration ceremony
//! runs on whatever the platform returned.

use std::{io::Cursor, num::TryFromIntError};

use bitflags::bitflags;
use ciborium::value::Value;
use coset::{
    iana::{self, EnumI64},
    AsCborValue, CborSerializable, CoseKey,
};
use serde::{Deserialize, Serialize};

use crate::{crypto::sha256, Bytes, DecodeError, RawPublicKey};

bitflags! {
    /// Flags of the authenticator data.
    ///
    /// <https://w3c.github.io/webauthn/#authdata-flags>
    #[repr(transparent)]
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct Flags: u8 {
        /// User Present, bit 0
        const UP = 1 << 0;
        /// User Verified, bit 2
        const UV = 1 << 2;
        /// Backup Eligibility, bit 3
        const BE = 1 << 3;
        /// Backup State, bit 4
        const BS = 1 << 4;
        /// Attested Credential Data, bit 6
        const AT = 1 << 6;
        /// Extension Data Included, bit 7
        const ED = 1 << 7;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::UP | Flags::UV
    }
}

impl From<Flags> for u8 {
    fn from(src: Flags) -> Self {
        src.bits()
    }
}

/// The AAGUID identifying the authenticator model, 16 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aaguid(pub [u8; 16]);

impl Aaguid {
    /// An all-zero AAGUID, as used when no attestation is conveyed.
    pub fn new_empty() -> Self {
        Self([0; 16])
    }
}

/// Fixed-length COSE_Key suffix layouts understood by the decoder.
///
/// A CTAP2-canonical EC2 key over P-256 (`kty`, `alg`, `crv`, `x`, `y`)
/// always occupies the final 77 bytes of the authenticator data it is
/// attached to. Supporting another curve means adding a variant here, not
/// silently changing an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoseKeyTail {
    /// ES256 over P-256: a 77-byte canonical COSE_Key.
    P256,
}

impl CoseKeyTail {
    /// How many trailing bytes of authenticator data the key occupies.
    pub const fn byte_len(self) -> usize {
        match self {
            Self::P256 => 77,
        }
    }
}

/// The attestation object returned by the authenticator when a credential
/// is created: a CBOR map of `fmt`, `attStmt` and `authData`.
///
/// Only `authData` is consumed here; the attestation statement is carried
/// as an opaque CBOR value.
///
/// <https://w3c.github.io/webauthn/#attestation-object>
#[derive(Debug, Serialize, Deserialize)]
pub struct AttestationObject {
    /// The attestation statement format identifier.
    pub fmt: String,

    /// The attestation statement, opaque to this library.
    #[serde(rename = "attStmt")]
    pub att_stmt: Value,

    /// The authenticator data, byte-exact as the authenticator emitted it.
    #[serde(rename = "authData")]
    pub auth_data: Bytes,
}

impl AttestationObject {
    /// Decode an attestation object from its CBOR bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        ciborium::de::from_reader(bytes).map_err(|_| DecodeError::InvalidCbor)
    }

    /// Encode back to CBOR bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        // SAFETY: serialization into a Vec cannot fail for this map shape
        ciborium::ser::into_writer(self, &mut bytes).unwrap();
        bytes
    }

    /// Extract the credential public key from the embedded authenticator data.
    pub fn public_key(&self) -> Result<RawPublicKey, DecodeError> {
        public_key_from_auth_data(&self.auth_data, CoseKeyTail::P256)
    }
}

/// Decode a CBOR attestation object and recover the raw uncompressed EC
/// public key from the trailing COSE_Key of its authenticator data.
///
/// Pure function of its input: same bytes in, same 65-byte key out, and
/// malformed input fails with a [`DecodeError`] rather than producing a
/// partial or zeroed key.
pub fn decode_public_key(attestation_object: &[u8]) -> Result<RawPublicKey, DecodeError> {
    AttestationObject::from_slice(attestation_object)?.public_key()
}

/// Take the fixed-length COSE_Key tail of `auth_data` and read the EC2
/// coordinates out of it.
///
/// The preceding fields (AAGUID, credential id and its length) are not
/// parsed; the tail slice is the contract. The slice must however parse as
/// exactly one COSE_Key map, consuming all of its bytes, so a buffer that
/// merely ends near a key is rejected instead of mis-sliced.
fn public_key_from_auth_data(
    auth_data: &[u8],
    tail: CoseKeyTail,
) -> Result<RawPublicKey, DecodeError> {
    let tail_len = tail.byte_len();
    if auth_data.len() < tail_len {
        return Err(DecodeError::TruncatedAuthenticatorData);
    }

    let tail_bytes = &auth_data[auth_data.len() - tail_len..];
    let mut reader = Cursor::new(tail_bytes);
    let value: Value =
        ciborium::de::from_reader(&mut reader).map_err(|_| DecodeError::InvalidCoseKey)?;
    let consumed = usize::try_from(reader.position()).map_err(|_| DecodeError::InvalidCoseKey)?;
    if consumed != tail_len {
        return Err(DecodeError::InvalidCoseKey);
    }

    let key = CoseKey::from_cbor_value(value).map_err(|_| DecodeError::InvalidCoseKey)?;
    let (x, y) = ec2_coordinates(&key)?;
    Ok(RawPublicKey::from_coordinates(&x, &y))
}

/// Read the `-2` (x) and `-3` (y) parameters of an EC2 COSE key as 32-byte
/// coordinates.
fn ec2_coordinates(key: &CoseKey) -> Result<([u8; 32], [u8; 32]), DecodeError> {
    if !matches!(key.kty, coset::RegisteredLabel::Assigned(iana::KeyType::EC2)) {
        return Err(DecodeError::InvalidCoseKey);
    }

    let (mut x, mut y) = (None, None);
    for (label, value) in &key.params {
        if let coset::Label::Int(i) = label {
            match iana::Ec2KeyParameter::from_i64(*i) {
                Some(iana::Ec2KeyParameter::X) => {
                    if value.as_bytes().and_then(|v| x.replace(v)).is_some() {
                        log::warn!("COSE key has multiple entries for the x coordinate");
                    }
                }
                Some(iana::Ec2KeyParameter::Y) => {
                    if value.as_bytes().and_then(|v| y.replace(v)).is_some() {
                        log::warn!("COSE key has multiple entries for the y coordinate");
                    }
                }
                _ => (),
            }
        }
    }
    let (Some(x), Some(y)) = (x, y) else {
        return Err(DecodeError::MissingCoordinate);
    };

    let x: [u8; 32] = x
        .as_slice()
        .try_into()
        .map_err(|_| DecodeError::InvalidCoordinateLength)?;
    let y: [u8; 32] = y
        .as_slice()
        .try_into()
        .map_err(|_| DecodeError::InvalidCoordinateLength)?;
    Ok((x, y))
}

/// Attested credential data: AAGUID, length-prefixed credential id and the
/// credential public key in COSE_Key form.
///
/// <https://w3c.github.io/webauthn/#attested-credential-data>
#[derive(Debug, Clone, PartialEq)]
pub struct AttestedCredentialData {
    /// The AAGUID of the authenticator.
    pub aaguid: Aaguid,

    /// The credential id. Not public so its length can never outgrow the
    /// u16 length prefix.
    credential_id: Vec<u8>,

    /// The credential public key in CTAP2 canonical COSE_Key encoding.
    pub key: CoseKey,
}

impl AttestedCredentialData {
    /// Create new attested credential data.
    ///
    /// # Error
    /// Returns an error if the length of `credential_id` cannot be
    /// represented by a u16.
    pub fn new(
        aaguid: Aaguid,
        credential_id: Vec<u8>,
        key: CoseKey,
    ) -> Result<Self, TryFromIntError> {
        u16::try_from(credential_id.len())?;

        Ok(Self {
            aaguid,
            credential_id,
            key,
        })
    }

    /// Get read access to the credential id.
    pub fn credential_id(&self) -> &[u8] {
        &self.credential_id
    }

    fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.aaguid.0);
        // SAFETY: the length was asserted to fit a u16 in the constructor.
        out.extend_from_slice(&u16::try_from(self.credential_id.len()).unwrap().to_be_bytes());
        out.extend_from_slice(&self.credential_id);
        // SAFETY: serializing a CoseKey built by this library cannot fail
        out.extend(self.key.clone().to_vec().unwrap());
        out
    }
}

/// The authenticator data structure: the contextual bindings the
/// authenticator covers with its signature.
///
/// <https://w3c.github.io/webauthn/#sctn-authenticator-data>
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatorData {
    /// SHA-256 hash of the RP ID the credential is scoped to.
    rp_id_hash: [u8; 32],

    /// See [`Flags`].
    pub flags: Flags,

    /// Signature counter, 32-bit unsigned big-endian integer.
    pub counter: u32,

    /// Present at creation only; its length depends on the credential id
    /// and the credential public key being attested.
    pub attested_credential_data: Option<AttestedCredentialData>,
}

impl AuthenticatorData {
    /// Create authenticator data for an RP ID with the default flags.
    pub fn new(rp_id: &str, counter: u32) -> Self {
        Self {
            rp_id_hash: sha256(rp_id.as_bytes()),
            flags: Flags::default(),
            counter,
            attested_credential_data: None,
        }
    }

    /// Attach attested credential data, setting [`Flags::AT`] as well.
    pub fn set_attested_credential_data(mut self, acd: AttestedCredentialData) -> Self {
        self.attested_credential_data = Some(acd);
        self.set_flags(Flags::AT)
    }

    /// Set additional [`Flags`].
    pub fn set_flags(mut self, flags: Flags) -> Self {
        self.flags |= flags;
        self
    }

    /// Get read access to the RP ID hash.
    pub fn rp_id_hash(&self) -> &[u8] {
        &self.rp_id_hash
    }

    /// Encode to the byte representation covered by assertion signatures.
    pub fn to_vec(&self) -> Vec<u8> {
        let flags = if self.attested_credential_data.is_some() {
            self.flags | Flags::AT
        } else {
            self.flags
        };

        let mut out = Vec::with_capacity(37);
        out.extend_from_slice(&self.rp_id_hash);
        out.push(flags.into());
        out.extend_from_slice(&self.counter.to_be_bytes());
        if let Some(acd) = &self.attested_credential_data {
            out.extend(acd.to_vec());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use coset::CoseKeyBuilder;

    use super::*;
    use crate::rand::random_vec;

    fn p256_cose_key(x: [u8; 32], y: [u8; 32]) -> CoseKey {
        CoseKeyBuilder::new_ec2_pub_key(iana::EllipticCurve::P_256, x.to_vec(), y.to_vec())
            .algorithm(iana::Algorithm::ES256)
            .build()
    }

    fn attestation_object_bytes(x: [u8; 32], y: [u8; 32]) -> Vec<u8> {
        let acd = AttestedCredentialData::new(Aaguid::new_empty(), random_vec(16), p256_cose_key(x, y))
            .unwrap();
        let auth_data = AuthenticatorData::new("example.com", 0).set_attested_credential_data(acd);
        AttestationObject {
            fmt: "none".into(),
            att_stmt: Value::Map(Vec::new()),
            auth_data: auth_data.to_vec().into(),
        }
        .to_vec()
    }

    #[test]
    fn canonical_p256_cose_key_is_the_fixed_tail_length() {
        let key = p256_cose_key([0x11; 32], [0x22; 32]);
        assert_eq!(key.to_vec().unwrap().len(), CoseKeyTail::P256.byte_len());
    }

    #[test]
    fn extracts_the_key_from_a_round_tripped_attestation_object() {
        let x = [0xa1; 32];
        let y = [0xb2; 32];
        let bytes = attestation_object_bytes(x, y);

        let key = decode_public_key(&bytes).unwrap();
        let mut expected = vec![0x04];
        expected.extend_from_slice(&x);
        expected.extend_from_slice(&y);
        assert_eq!(key.as_bytes(), expected.as_slice());
    }

    #[test]
    fn decoding_is_idempotent() {
        let bytes = attestation_object_bytes([0x0f; 32], [0xf0; 32]);
        assert_eq!(
            decode_public_key(&bytes).unwrap(),
            decode_public_key(&bytes).unwrap()
        );
    }

    #[test]
    fn rejects_short_authenticator_data() {
        let object = AttestationObject {
            fmt: "none".into(),
            att_stmt: Value::Map(Vec::new()),
            // a plain assertion-shaped payload: hash + flags + counter only
            auth_data: AuthenticatorData::new("example.com", 7).to_vec().into(),
        };
        assert_eq!(
            object.public_key(),
            Err(DecodeError::TruncatedAuthenticatorData)
        );
    }

    #[test]
    fn rejects_a_tail_that_is_not_one_whole_cose_map() {
        // starts with a well-formed one-entry map but leaves 74 trailing bytes
        let mut auth_data = vec![0u8; 37];
        auth_data.extend_from_slice(&[0xa1, 0x01, 0x02]);
        auth_data.extend_from_slice(&[0x00; 74]);
        assert_eq!(auth_data.len(), 37 + 77);

        let object = AttestationObject {
            fmt: "none".into(),
            att_stmt: Value::Map(Vec::new()),
            auth_data: auth_data.into(),
        };
        assert_eq!(object.public_key(), Err(DecodeError::InvalidCoseKey));
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert_eq!(
            decode_public_key(&[0xff; 100]),
            Err(DecodeError::InvalidCbor)
        );
    }

    #[test]
    fn rejects_a_key_missing_a_coordinate() {
        let mut key = p256_cose_key([0x11; 32], [0x22; 32]);
        key.params.retain(|(label, _)| {
            *label != coset::Label::Int(iana::Ec2KeyParameter::Y.to_i64())
        });
        assert_eq!(ec2_coordinates(&key), Err(DecodeError::MissingCoordinate));
    }

    #[test]
    fn rejects_mis_sized_coordinates() {
        let key = CoseKeyBuilder::new_ec2_pub_key(
            iana::EllipticCurve::P_256,
            vec![0x11; 31],
            vec![0x22; 32],
        )
        .build();
        assert_eq!(
            ec2_coordinates(&key),
            Err(DecodeError::InvalidCoordinateLength)
        );
    }

    #[test]
    fn authenticator_data_layout_is_fixed_width_up_front() {
        let data = AuthenticatorData::new("example.com", 0x01020304).to_vec();
        assert_eq!(data.len(), 37);
        assert_eq!(&data[..32], sha256(b"example.com").as_slice());
        assert_eq!(data[32], u8::from(Flags::default()));
        assert_eq!(&data[33..], &[0x01, 0x02, 0x03, 0x04]);
    }
}
