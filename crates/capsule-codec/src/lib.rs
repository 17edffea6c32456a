//! Content codec for the Capsule time-lock ledger.
//!
//! This crate prepares and recovers the opaque blob the ledger stores:
//! - Hex wire codec between ciphertext bytes and the lowercase hex string
//!   persisted on-ledger
//! - Passphrase-based sealing: PBKDF2-HMAC-SHA256 key derivation plus
//!   AES-256-GCM authenticated encryption, `salt ‖ nonce ‖ ciphertext`
//! - The transient JSON payload (`text` + file references) exchanged by
//!   the application layer
//!
//! The codec is purely functional: no shared state, fresh randomness per
//! call, and it never returns partially decrypted output.

pub mod error;
pub mod payload;
pub mod sealed;
pub mod wire;

pub use error::CodecError;
pub use payload::{CapsulePayload, FileAttachment};
pub use sealed::{decrypt, encrypt, open_payload, seal_payload};
pub use wire::{hex_decode, hex_encode};
