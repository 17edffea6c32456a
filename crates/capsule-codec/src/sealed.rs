//! Passphrase-based sealing of capsule payloads.
//!
//! Layout of the sealed output, front to back:
//!
//! ```text
//! [ salt: 16 bytes ][ nonce: 12 bytes ][ AES-256-GCM ciphertext + tag ]
//! ```
//!
//! The key is derived with PBKDF2-HMAC-SHA256 from the passphrase and the
//! salt. Salt and nonce are freshly drawn from `OsRng` on every call, so two
//! seals of identical input never produce the same bytes. GCM authentication
//! turns a wrong passphrase or any corruption into a hard
//! [`CodecError::DecryptionFailed`] instead of garbled plaintext.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::error::CodecError;
use crate::payload::CapsulePayload;

/// Salt length prepended to the sealed output.
pub const SALT_LEN: usize = 16;
/// GCM nonce length following the salt.
pub const NONCE_LEN: usize = 12;
/// PBKDF2-HMAC-SHA256 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

const KEY_LEN: usize = 32;

fn derive_key(passphrase: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    key
}

/// Seal `plaintext` under `passphrase`.
///
/// Returns `salt ‖ nonce ‖ ciphertext`. Every invocation draws a fresh salt
/// and nonce, so identical inputs yield different outputs.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, CodecError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CodecError::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| CodecError::EncryptionFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Open sealed bytes with `passphrase`.
///
/// Fails with [`CodecError::DecryptionFailed`] on a wrong passphrase,
/// truncated input, or any authentication failure. Never returns
/// best-effort plaintext.
pub fn decrypt(cipher_bytes: &[u8], passphrase: &str) -> Result<Vec<u8>, CodecError> {
    if cipher_bytes.len() < SALT_LEN + NONCE_LEN {
        return Err(CodecError::DecryptionFailed);
    }

    let (salt, rest) = cipher_bytes.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let key = derive_key(passphrase, salt);
    let cipher =
        Aes256Gcm::new_from_slice(&key).map_err(|_| CodecError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CodecError::DecryptionFailed)
}

/// Serialize and seal a payload in one step.
pub fn seal_payload(payload: &CapsulePayload, passphrase: &str) -> Result<Vec<u8>, CodecError> {
    encrypt(&payload.to_bytes()?, passphrase)
}

/// Open sealed bytes and parse the payload in one step.
pub fn open_payload(cipher_bytes: &[u8], passphrase: &str) -> Result<CapsulePayload, CodecError> {
    CapsulePayload::from_bytes(&decrypt(cipher_bytes, passphrase)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn roundtrip() {
        let sealed = encrypt(b"hello", "pw").unwrap();
        assert_eq!(decrypt(&sealed, "pw").unwrap(), b"hello");
    }

    #[test]
    fn roundtrip_empty_plaintext() {
        let sealed = encrypt(b"", "pw").unwrap();
        assert_eq!(decrypt(&sealed, "pw").unwrap(), b"");
    }

    #[test]
    fn output_layout_has_fixed_prefix() {
        let sealed = encrypt(b"x", "pw").unwrap();
        // salt + nonce + 1 plaintext byte + 16-byte GCM tag
        assert_eq!(sealed.len(), SALT_LEN + NONCE_LEN + 1 + 16);
    }

    #[test]
    fn identical_inputs_seal_differently() {
        let a = encrypt(b"same", "pw").unwrap();
        let b = encrypt(b"same", "pw").unwrap();
        assert_ne!(a, b);
        assert_eq!(decrypt(&a, "pw").unwrap(), b"same");
        assert_eq!(decrypt(&b, "pw").unwrap(), b"same");
    }

    #[test]
    fn wrong_passphrase_is_rejected() {
        let sealed = encrypt(b"secret", "right").unwrap();
        assert_eq!(
            decrypt(&sealed, "wrong").unwrap_err(),
            CodecError::DecryptionFailed
        );
    }

    #[test]
    fn truncated_input_is_rejected() {
        let sealed = encrypt(b"secret", "pw").unwrap();
        for len in [0, SALT_LEN - 1, SALT_LEN + NONCE_LEN - 1, sealed.len() - 1] {
            assert_eq!(
                decrypt(&sealed[..len], "pw").unwrap_err(),
                CodecError::DecryptionFailed,
                "expected failure at length {len}"
            );
        }
    }

    #[test]
    fn corrupted_ciphertext_is_rejected() {
        let mut sealed = encrypt(b"secret", "pw").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert_eq!(
            decrypt(&sealed, "pw").unwrap_err(),
            CodecError::DecryptionFailed
        );
    }

    #[test]
    fn corrupted_salt_is_rejected() {
        // Flipping a salt bit changes the derived key, so the tag check fails.
        let mut sealed = encrypt(b"secret", "pw").unwrap();
        sealed[0] ^= 0x01;
        assert_eq!(
            decrypt(&sealed, "pw").unwrap_err(),
            CodecError::DecryptionFailed
        );
    }

    proptest! {
        // PBKDF2 at full iteration count is slow; keep the case count modest.
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn roundtrip_any_payload(
            plaintext in proptest::collection::vec(any::<u8>(), 0..256),
            passphrase in "[a-zA-Z0-9 ]{1,24}",
        ) {
            let sealed = encrypt(&plaintext, &passphrase).unwrap();
            prop_assert_eq!(decrypt(&sealed, &passphrase).unwrap(), plaintext);
        }
    }
}
