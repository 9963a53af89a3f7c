use std::ops::{Deref, DerefMut};

use serde::{de::Visitor, Deserialize, Deserializer, Serialize};
use typeshare::typeshare;

use super::encoding;

/// A byte buffer that serializes to the transport format's natural byte
/// representation: a byte string in CBOR, an array of numbers in JSON.
///
/// Deserialization is deliberately liberal about what it receives, because
/// byte payloads reach this library from a JavaScript shell in several
/// shapes: real byte strings, number arrays, and `base64`/`base64url`
/// encoded strings are all accepted.
#[typeshare(transparent)]
#[derive(Debug, Default, PartialEq, Eq, Clone)]
#[repr(transparent)]
pub struct Bytes(Vec<u8>);

/// The string given for decoding is neither `base64url` nor `base64`
/// encoded data.
#[derive(Debug)]
pub struct NotBase64Encoded;

impl Bytes {
    /// View the underlying bytes as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Consume the wrapper and take the buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Bytes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(buf: Vec<u8>) -> Self {
        Bytes(buf)
    }
}

impl From<&[u8]> for Bytes {
    fn from(buf: &[u8]) -> Self {
        Bytes(buf.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(src: Bytes) -> Self {
        src.0
    }
}

impl TryFrom<&str> for Bytes {
    type Error = NotBase64Encoded;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        encoding::try_from_base64url(value)
            .or_else(|| encoding::try_from_base64(value))
            .map(Self)
            .ok_or(NotBase64Encoded)
    }
}

impl Serialize for Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TransportVisitor;

        impl<'de> Visitor<'de> for TransportVisitor {
            type Value = Bytes;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("bytes, a sequence of bytes, or a base64(url) string")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                Ok(v.into())
            }

            fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
                Ok(v.into())
            }

            // visit_string and visit_borrowed_str both forward here
            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.try_into().map_err(|NotBase64Encoded| {
                    E::invalid_value(serde::de::Unexpected::Str(v), &self)
                })
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut buf = Vec::with_capacity(seq.size_hint().unwrap_or_default());
                while let Some(byte) = seq.next_element::<u8>()? {
                    buf.push(byte);
                }
                Ok(Bytes(buf))
            }
        }

        deserializer.deserialize_any(TransportVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn deserialize_many_formats_into_the_same_bytes() {
        let json = r#"{
            "array": [101,195,212,161,191,112,75,189,152,52,121,17,62,113,114,164],
            "base64url": "ZcPUob9wS72YNHkRPnFypA",
            "base64": "ZcPUob9wS72YNHkRPnFypA=="
        }"#;

        let deserialized: HashMap<&str, Bytes> =
            serde_json::from_str(json).expect("failed to deserialize");

        assert_eq!(deserialized["array"], deserialized["base64url"]);
        assert_eq!(deserialized["base64url"], deserialized["base64"]);
    }

    #[test]
    fn cbor_byte_strings_round_trip() {
        let payload = Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]);
        let mut cbor = Vec::new();
        ciborium::ser::into_writer(&payload, &mut cbor).unwrap();
        // major type 2 (byte string), length 4
        assert_eq!(cbor[0], 0x44);

        let back: Bytes = ciborium::de::from_reader(cbor.as_slice()).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn rejects_strings_that_are_not_base64() {
        serde_json::from_str::<Bytes>(r#""!!definitely not base64!!""#)
            .expect_err("did not give an error as expected");
    }
}
