//! Conversion of ASN.1 DER ECDSA signatures into the fixed-width raw form
//! expected by raw `r‖s` verification APIs.

use std::fmt;

use crate::{encoding, DecodeError};

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;
const SCALAR_LEN: usize = 32;

/// A fixed-width ECDSA P-256 signature: `r` then `s`, each an unsigned
/// big-endian value left-padded to exactly 32 bytes.
///
/// Constructed from the variable-length DER form with [`RawSignature::from_der`];
/// transient, rebuilt for every verification attempt.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawSignature([u8; Self::LEN]);

impl RawSignature {
    /// Length in bytes of the raw `r‖s` concatenation.
    pub const LEN: usize = 64;

    /// Convert a DER `SEQUENCE { INTEGER r, INTEGER s }` into raw form.
    ///
    /// The SEQUENCE and INTEGER headers are validated and the declared
    /// lengths are honored, so malformed or truncated input fails with a
    /// [`DecodeError`] instead of being mis-sliced. Each INTEGER may carry
    /// at most one leading `0x00` sign-padding byte (present exactly when
    /// the top bit of the 32-byte value would otherwise read as negative),
    /// and values shorter than 32 bytes are left-padded back to full width.
    pub fn from_der(der: &[u8]) -> Result<Self, DecodeError> {
        let (&tag, rest) = der.split_first().ok_or(DecodeError::InvalidDerSignature)?;
        if tag != SEQUENCE_TAG {
            return Err(DecodeError::InvalidDerSignature);
        }
        let (&len, body) = rest.split_first().ok_or(DecodeError::InvalidDerSignature)?;
        // P-256 signatures are at most 72 bytes, so the single-byte
        // short-form length always applies.
        if len >= 0x80 || usize::from(len) != body.len() {
            return Err(DecodeError::InvalidDerSignature);
        }

        let (r, body) = read_integer(body)?;
        let (s, body) = read_integer(body)?;
        if !body.is_empty() {
            return Err(DecodeError::InvalidDerSignature);
        }

        let mut raw = [0u8; Self::LEN];
        copy_scalar(r, &mut raw[..SCALAR_LEN])?;
        copy_scalar(s, &mut raw[SCALAR_LEN..])?;
        Ok(Self(raw))
    }

    /// The 64-byte `r‖s` concatenation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The `r` value, 32 bytes big-endian.
    pub fn r(&self) -> &[u8] {
        &self.0[..SCALAR_LEN]
    }

    /// The `s` value, 32 bytes big-endian.
    pub fn s(&self) -> &[u8] {
        &self.0[SCALAR_LEN..]
    }
}

impl AsRef<[u8]> for RawSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<RawSignature> for [u8; RawSignature::LEN] {
    fn from(src: RawSignature) -> Self {
        src.0
    }
}

impl fmt::Debug for RawSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RawSignature({})", encoding::hex(&self.0))
    }
}

/// Split one `INTEGER` off the front of `input`, returning its value bytes
/// and the remainder.
fn read_integer(input: &[u8]) -> Result<(&[u8], &[u8]), DecodeError> {
    let (&tag, rest) = input.split_first().ok_or(DecodeError::InvalidDerSignature)?;
    if tag != INTEGER_TAG {
        return Err(DecodeError::InvalidDerSignature);
    }
    let (&len, rest) = rest.split_first().ok_or(DecodeError::InvalidDerSignature)?;
    let len = usize::from(len);
    if len == 0 || len > rest.len() {
        return Err(DecodeError::InvalidDerSignature);
    }
    Ok(rest.split_at(len))
}

/// Left-pad a DER INTEGER value into a 32-byte scalar slot.
fn copy_scalar(mut value: &[u8], out: &mut [u8]) -> Result<(), DecodeError> {
    if value.len() == SCALAR_LEN + 1 {
        // A 33rd byte can only be the sign pad for a value whose top bit is set.
        if value[0] != 0x00 {
            return Err(DecodeError::IntegerOutOfRange);
        }
        value = &value[1..];
    }
    if value.len() > SCALAR_LEN {
        return Err(DecodeError::IntegerOutOfRange);
    }
    out[SCALAR_LEN - value.len()..].copy_from_slice(value);
    Ok(())
}
