use thiserror::Error;

use capsule_client::ClientError;
use capsule_codec::CodecError;

pub type SdkResult<T> = Result<T, SdkError>;

/// Errors surfaced by the high-level capsule flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SdkError {
    /// The reveal came back empty: the capsule is still locked or the
    /// caller is not a party. The ledger deliberately does not say which;
    /// use `status()` to tell them apart.
    #[error("capsule {id} is sealed for this caller")]
    CapsuleSealed { id: u64 },

    /// A seal request with neither text nor files.
    #[error("capsule payload is empty")]
    EmptyCapsule,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
