//! The second, independent implementation of the verification protocol.

use crosskey_types::webauthn::CollectedClientData;
use p256::ecdsa::{signature::Verifier, DerSignature};
use sha2::{Digest, Sha256};

use crate::{
    verifier::{AssertionVerifier, VerificationRequest},
    verifying_key, VerifyError,
};

/// Verifies an assertion without trusting any byte-level work done
/// elsewhere in this workspace: the client data JSON is reconstructed from
/// its structured fields and the DER signature goes straight into p256's
/// own parser.
///
/// A divergence from [`LocalVerifier`](crate::LocalVerifier) on identical
/// input means one of the two paths mis-assembled the signed message or
/// mis-converted the signature.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceVerifier;

impl AssertionVerifier for ReferenceVerifier {
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<bool, VerifyError> {
        let Some(key) = verifying_key(request.public_key)? else {
            return Ok(false);
        };

        let signature = match DerSignature::from_bytes(&request.assertion.signature) {
            Ok(signature) => signature,
            Err(err) => {
                log::debug!("assertion signature rejected: {err}");
                return Ok(false);
            }
        };

        let client_data = CollectedClientData::for_assertion(
            &Sha256::digest(request.challenge),
            &request.rp.origin,
            request.rp.cross_origin,
        );
        let client_data =
            serde_json::to_vec(&client_data).map_err(|_| VerifyError::InvalidClientData)?;

        let digest = Sha256::digest(&client_data);
        let mut message =
            Vec::with_capacity(request.assertion.authenticator_data.len() + digest.len());
        message.extend_from_slice(&request.assertion.authenticator_data);
        message.extend_from_slice(&digest);

        Ok(key.verify(&message, &signature).is_ok())
    }
}
