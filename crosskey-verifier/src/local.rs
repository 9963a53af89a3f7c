//! The in-process verifier, running over the raw signature path.

use crosskey_types::{crypto::sha256, RawSignature};
use p256::ecdsa::{signature::Verifier, Signature};

use crate::{
    verifier::{AssertionVerifier, VerificationRequest},
    verifying_key, VerifyError,
};

/// Verifies an assertion the way the original browser-side check does:
/// hash the client data bytes exactly as received, convert the DER
/// signature to fixed-width `r‖s` with [`RawSignature::from_der`], and
/// check it over `authenticator_data ‖ SHA-256(client_data_json)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalVerifier;

impl AssertionVerifier for LocalVerifier {
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<bool, VerifyError> {
        let Some(key) = verifying_key(request.public_key)? else {
            return Ok(false);
        };

        let raw = match RawSignature::from_der(&request.assertion.signature) {
            Ok(raw) => raw,
            Err(err) => {
                log::debug!("assertion signature rejected: {err}");
                return Ok(false);
            }
        };
        let signature = match Signature::from_slice(raw.as_bytes()) {
            Ok(signature) => signature,
            Err(_) => return Ok(false),
        };

        let digest = sha256(&request.assertion.client_data_json);
        let mut message =
            Vec::with_capacity(request.assertion.authenticator_data.len() + digest.len());
        message.extend_from_slice(&request.assertion.authenticator_data);
        message.extend_from_slice(&digest);

        Ok(key.verify(&message, &signature).is_ok())
    }
}
