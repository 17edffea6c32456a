//! Hex wire codec.
//!
//! The ledger persists ciphertext as a lowercase hex string: two hex digits
//! per byte, high nibble first. Decoding is the exact inverse and is strict:
//! odd-length input and non-hex characters fail with
//! [`CodecError::InvalidEncoding`] rather than being zeroed out, since a
//! silently corrupted byte would surface later as an opaque authentication
//! failure during decryption.

use crate::error::CodecError;

/// Encode bytes as a lowercase hex string (two digits per byte).
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a lowercase hex string back into bytes.
///
/// Rejects odd-length input and any character outside `[0-9a-fA-F]`.
pub fn hex_decode(s: &str) -> Result<Vec<u8>, CodecError> {
    hex::decode(s).map_err(|e| CodecError::InvalidEncoding(e.to_string()))
}
