use thiserror::Error;

/// Errors produced by the content codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Malformed hex: odd length or a non-hex character.
    #[error("invalid hex encoding: {0}")]
    InvalidEncoding(String),

    /// Wrong passphrase, truncated input, or failed authentication tag.
    /// Deliberately carries no detail: the causes are indistinguishable by
    /// construction under an authenticated cipher.
    #[error("decryption failed")]
    DecryptionFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("payload serialization error: {0}")]
    Serialization(String),
}
