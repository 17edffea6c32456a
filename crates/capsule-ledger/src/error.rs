/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger storage has not been initialized")]
    NotInitialized,

    #[error("ledger storage is already initialized")]
    AlreadyInitialized,

    #[error("caller is not authorized for this operation")]
    Unauthorized,

    #[error("unlock time {unlock_time} is not in the future (now: {now})")]
    UnlockTimeNotFuture { unlock_time: u64, now: u64 },

    #[error("no capsule with id {id}")]
    NotFound { id: u64 },

    #[error("stored ciphertext is not valid hex: {0}")]
    InvalidEncoding(String),

    #[error("ledger lock poisoned")]
    LockPoisoned,
}
