//! Persistence of registered credential public keys.

use std::{collections::HashMap, fmt};

use async_trait::async_trait;
use crosskey_types::RawPublicKey;

/// Opaque storage failure, carrying the backend's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "key store failure: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Use this on a type that enables storage and fetching of credential
/// public keys.
///
/// The persisted value is the 65-byte raw key; [`RawPublicKey`]'s serde
/// implementation keeps any byte-oriented backend lossless.
#[async_trait]
pub trait KeyStore {
    /// Persist the key under the credential id, replacing any previous one.
    async fn put(&mut self, credential_id: &str, key: RawPublicKey) -> Result<(), StoreError>;

    /// Fetch the key registered under the credential id, if any.
    async fn get(&self, credential_id: &str) -> Result<Option<RawPublicKey>, StoreError>;
}

/// In-memory store for credential public keys.
///
/// Useful for tests.
pub type MemoryStore = HashMap<String, RawPublicKey>;

#[async_trait]
impl KeyStore for MemoryStore {
    async fn put(&mut self, credential_id: &str, key: RawPublicKey) -> Result<(), StoreError> {
        self.insert(credential_id.to_owned(), key);
        Ok(())
    }

    async fn get(&self, credential_id: &str) -> Result<Option<RawPublicKey>, StoreError> {
        Ok(HashMap::get(self, credential_id).cloned())
    }
}
