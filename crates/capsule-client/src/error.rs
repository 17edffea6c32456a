use thiserror::Error;

use capsule_ledger::LedgerError;

/// Errors crossing a collaborator boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("no blob for locator {0}")]
    BlobNotFound(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("transport error: {0}")]
    Transport(String),
}
