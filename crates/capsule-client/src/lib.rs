//! External collaborator boundaries for the Capsule system.
//!
//! The core ledger and codec perform no I/O of their own; everything that
//! talks to the outside world goes through the two interfaces here:
//!
//! - [`LedgerClient`] — submit entry calls and run queries against a capsule
//!   ledger deployment, with the caller identity authenticated by the host
//! - [`BlobStore`] — opaque byte storage for file attachments, addressed by
//!   content-derived [`Locator`]s
//!
//! In-memory implementations ([`DirectLedgerClient`], [`InMemoryBlobStore`])
//! serve tests and embedded use; a production deployment substitutes its own
//! transport behind the same traits.

pub mod blob;
pub mod error;
pub mod ledger;

pub use blob::{BlobStore, InMemoryBlobStore, Locator};
pub use error::ClientError;
pub use ledger::{DirectLedgerClient, LedgerClient};
