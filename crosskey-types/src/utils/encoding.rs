//! Byte-to-string encodings used consistently across the `crosskey`
//! libraries, lining up with what the webauthn ecosystem expects.

use data_encoding::{BASE64URL_NOPAD, BASE64_NOPAD, HEXLOWER};

/// Convert bytes to base64url without padding.
pub fn base64url(data: &[u8]) -> String {
    BASE64URL_NOPAD.encode(data)
}

/// Convert bytes to lowercase hex.
pub fn hex(data: &[u8]) -> String {
    HEXLOWER.encode(data)
}

/// Try parsing from base64 with or without padding.
pub(crate) fn try_from_base64(input: &str) -> Option<Vec<u8>> {
    BASE64_NOPAD
        .decode(input.trim_end_matches('=').as_bytes())
        .ok()
}

/// Try parsing from base64url with or without padding.
pub fn try_from_base64url(input: &str) -> Option<Vec<u8>> {
    BASE64URL_NOPAD
        .decode(input.trim_end_matches('=').as_bytes())
        .ok()
}
