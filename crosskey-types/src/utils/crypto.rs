//! The one digest primitive everything here agrees on.

use sha2::{Digest, Sha256};

/// SHA-256 of `data`, as a plain 32-byte array.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}
