//! Client-side webauthn payloads: the collected client data and the byte
//! payloads of an assertion.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use typeshare::typeshare;

use crate::{encoding, Bytes};

/// The byte payloads of a successful `navigator.credentials.get` call.
///
/// All three fields are carried byte-exact as the platform produced them;
/// in particular `client_data_json` must not be re-serialized before
/// hashing, since the signature covers the platform's serialization.
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    /// The authenticator data covered by the signature.
    pub authenticator_data: Bytes,

    /// The JSON serialization of the collected client data.
    pub client_data_json: Bytes,

    /// ASN.1 DER ECDSA signature over
    /// `authenticator_data ‖ SHA-256(client_data_json)`.
    pub signature: Bytes,
}

/// The contextual bindings of both the Relying Party and the client.
///
/// The serialized member order (`type`, `challenge`, `origin`,
/// `crossOrigin`, then anything else) matches how clients serialize this
/// structure before signing, so re-serializing a value of this type
/// reproduces the signed bytes. Parsing is tolerant of unknown members and
/// preserves their order.
///
/// <https://w3c.github.io/webauthn/#dictionary-client-data>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedClientData {
    /// Distinguishes a registration from an authentication ceremony, to
    /// prevent signature confusion attacks.
    #[serde(rename = "type")]
    pub ty: ClientDataType,

    /// The base64url encoding of the challenge the authenticator was given.
    pub challenge: String,

    /// The fully qualified origin of the requester.
    pub origin: String,

    /// The inverse of the `sameOriginWithAncestors` argument the client was
    /// invoked with.
    #[serde(default, serialize_with = "truthiness")]
    pub cross_origin: Option<bool>,

    /// Members unknown to this library, kept in serialization order.
    #[serde(flatten)]
    pub unknown_keys: IndexMap<String, serde_json::Value>,
}

impl CollectedClientData {
    /// Client data for an assertion whose authenticator-facing challenge
    /// was `challenge` bytes, with no extra members.
    pub fn for_assertion(challenge: &[u8], origin: &str, cross_origin: bool) -> Self {
        Self {
            ty: ClientDataType::Get,
            challenge: encoding::base64url(challenge),
            origin: origin.to_owned(),
            cross_origin: Some(cross_origin),
            unknown_keys: IndexMap::new(),
        }
    }
}

fn truthiness<S>(cross_origin: &Option<bool>, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    ser.serialize_bool(cross_origin.filter(|b| *b).is_some())
}

/// Limits the values of [`CollectedClientData::ty`] and serializes them to
/// their static strings.
#[typeshare]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ClientDataType {
    /// Serializes to the string `"webauthn.create"`
    #[serde(rename = "webauthn.create")]
    Create,

    /// Serializes to the string `"webauthn.get"`
    #[serde(rename = "webauthn.get")]
    Get,
}

impl fmt::Display for ClientDataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Create => "webauthn.create",
            Self::Get => "webauthn.get",
        };
        f.write_str(name)
    }
}
