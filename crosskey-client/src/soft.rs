//! A software authenticator.
//!
//! Stands in for the platform credential service in tests and examples:
//! it holds P-256 signing keys in memory, fabricates byte-exact
//! attestation objects and assertions, and never exposes a private key
//! through its API.

use std::collections::HashMap;

use async_trait::async_trait;
use ciborium::value::Value;
use coset::iana;
use crosskey_types::{
    attestation::{Aaguid, AttestationObject, AttestedCredentialData, AuthenticatorData},
    crypto::sha256,
    encoding,
    rand::random_vec,
    webauthn::{Assertion, ClientDataType, CollectedClientData},
};
use p256::ecdsa::{signature::Signer, Signature, SigningKey};

use crate::authenticator::{
    AuthenticatorError, AuthenticatorService, CreateOptions, CreatedCredential, RequestOptions,
};

/// An in-memory authenticator backed by p256 signing keys.
///
/// Each credential is scoped to the RP ID it was created for, and the
/// signature counter increments on every assertion like a real
/// authenticator's would.
pub struct SoftAuthenticator {
    aaguid: Aaguid,
    origin: String,
    credentials: HashMap<String, SoftCredential>,
    counter: u32,
}

struct SoftCredential {
    rp_id: String,
    key: SigningKey,
}

impl SoftAuthenticator {
    /// A fresh authenticator serving requests from the given origin.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            aaguid: Aaguid::new_empty(),
            origin: origin.into(),
            credentials: HashMap::new(),
            counter: 0,
        }
    }

    fn client_data_json(&self, ty: ClientDataType, challenge: &[u8]) -> Vec<u8> {
        let mut client_data = CollectedClientData::for_assertion(challenge, &self.origin, false);
        client_data.ty = ty;
        // SAFETY: a CollectedClientData without extra members always
        // serializes cleanly
        serde_json::to_vec(&client_data).unwrap()
    }
}

#[async_trait]
impl AuthenticatorService for SoftAuthenticator {
    async fn create(
        &mut self,
        options: CreateOptions,
    ) -> Result<CreatedCredential, AuthenticatorError> {
        let key = SigningKey::random(&mut rand::thread_rng());
        let point = key.verifying_key().to_encoded_point(false);
        // SAFETY: an uncompressed point always carries both coordinates
        let x = point.x().unwrap().to_vec();
        let y = point.y().unwrap().to_vec();
        let cose_key = coset::CoseKeyBuilder::new_ec2_pub_key(iana::EllipticCurve::P_256, x, y)
            .algorithm(iana::Algorithm::ES256)
            .build();

        let credential_id = random_vec(16);
        let attested = AttestedCredentialData::new(self.aaguid, credential_id.clone(), cose_key)
            .map_err(|e| AuthenticatorError::Platform(e.to_string()))?;
        let auth_data =
            AuthenticatorData::new(&options.rp_id, self.counter).set_attested_credential_data(attested);

        let attestation_object = AttestationObject {
            fmt: "none".into(),
            att_stmt: Value::Map(Vec::new()),
            auth_data: auth_data.to_vec().into(),
        };

        let id = encoding::base64url(&credential_id);
        self.credentials.insert(
            id.clone(),
            SoftCredential {
                rp_id: options.rp_id,
                key,
            },
        );

        Ok(CreatedCredential {
            id,
            attestation_object: attestation_object.to_vec().into(),
        })
    }

    async fn get(&mut self, options: RequestOptions) -> Result<Assertion, AuthenticatorError> {
        let credential = self
            .credentials
            .values()
            .find(|credential| credential.rp_id == options.rp_id)
            .ok_or(AuthenticatorError::NoCredentials)?;

        self.counter += 1;
        let authenticator_data = AuthenticatorData::new(&options.rp_id, self.counter).to_vec();
        let client_data_json = self.client_data_json(ClientDataType::Get, &options.challenge);

        let mut message = authenticator_data.clone();
        message.extend_from_slice(&sha256(&client_data_json));
        let signature: Signature = credential.key.sign(&message);

        Ok(Assertion {
            authenticator_data: authenticator_data.into(),
            client_data_json: client_data_json.into(),
            signature: signature.to_der().as_bytes().to_vec().into(),
        })
    }
}
