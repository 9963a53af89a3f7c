//! The credential public key in its persisted form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{encoding, Bytes, DecodeError};

/// An uncompressed SEC1 P-256 public key: the `0x04` point marker followed
/// by the 32-byte x and y coordinates.
///
/// This is the canonical form produced once at registration by
/// [`decode_public_key`](crate::attestation::decode_public_key), persisted
/// by the caller, and used for every subsequent signature verification. It
/// is immutable after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct RawPublicKey([u8; Self::LEN]);

impl RawPublicKey {
    /// Length in bytes of the uncompressed SEC1 encoding.
    pub const LEN: usize = 65;

    const UNCOMPRESSED_POINT: u8 = 0x04;

    /// Assemble a key from its affine coordinates.
    pub fn from_coordinates(x: &[u8; 32], y: &[u8; 32]) -> Self {
        let mut bytes = [0u8; Self::LEN];
        bytes[0] = Self::UNCOMPRESSED_POINT;
        bytes[1..33].copy_from_slice(x);
        bytes[33..].copy_from_slice(y);
        Self(bytes)
    }

    /// The full SEC1 encoding, marker byte included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The x coordinate, 32 bytes big-endian.
    pub fn x(&self) -> &[u8] {
        &self.0[1..33]
    }

    /// The y coordinate, 32 bytes big-endian.
    pub fn y(&self) -> &[u8] {
        &self.0[33..]
    }
}

impl AsRef<[u8]> for RawPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for RawPublicKey {
    type Error = DecodeError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; Self::LEN] = value
            .try_into()
            .map_err(|_| DecodeError::InvalidPublicKey)?;
        if bytes[0] != Self::UNCOMPRESSED_POINT {
            return Err(DecodeError::InvalidPublicKey);
        }
        Ok(Self(bytes))
    }
}

impl fmt::Debug for RawPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RawPublicKey({})", encoding::hex(&self.0))
    }
}

impl Serialize for RawPublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for RawPublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = Bytes::deserialize(deserializer)?;
        Self::try_from(bytes.as_slice()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_marker_then_x_then_y() {
        let x = [0xaa; 32];
        let y = [0xbb; 32];
        let key = RawPublicKey::from_coordinates(&x, &y);

        assert_eq!(key.as_bytes().len(), RawPublicKey::LEN);
        assert_eq!(key.as_bytes()[0], 0x04);
        assert_eq!(key.x(), &x);
        assert_eq!(key.y(), &y);
    }

    #[test]
    fn persists_losslessly_through_json() {
        let key = RawPublicKey::from_coordinates(&[0x01; 32], &[0xfe; 32]);
        let json = serde_json::to_string(&key).unwrap();
        // number array, like the original localStorage format
        assert!(json.starts_with("[4,1,"));

        let back: RawPublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn rejects_wrong_lengths_and_markers() {
        assert!(RawPublicKey::try_from([0x04; 64].as_slice()).is_err());
        assert!(RawPublicKey::try_from([0x04; 66].as_slice()).is_err());
        assert!(RawPublicKey::try_from([0x02; 65].as_slice()).is_err());
    }
}
