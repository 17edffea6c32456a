//! High-level SDK for the Capsule time-lock ledger.
//!
//! Ties the pieces together the way the end-user application does: build a
//! payload, push file bytes to the blob store, seal under a passphrase,
//! append to the ledger — and later reveal, decrypt, and resolve the
//! attachments. This is the main entry point for applications embedding
//! Capsule.

pub mod error;
pub mod vault;

pub use error::{SdkError, SdkResult};
pub use vault::{Attachment, CapsuleStatus, CapsuleVault, FileInput, OpenedCapsule, SealRequest};

// Re-export key types
pub use capsule_client::{
    BlobStore, DirectLedgerClient, InMemoryBlobStore, LedgerClient, Locator,
};
pub use capsule_codec::{CapsulePayload, FileAttachment};
pub use capsule_ledger::{InMemoryCapsuleLedger, ManualClock, SystemClock};
pub use capsule_types::{Address, CapsuleMeta, ContentType};
