use capsule_types::{Address, CapsuleMeta, ContentType};

use crate::error::LedgerError;

/// Typed result of a reveal attempt, for application code.
///
/// The wire contract collapses every non-open case into an empty value so a
/// prober cannot tell "too early" from "not yours"; this enum is the richer
/// channel that stays inside the calling process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reveal {
    /// Gate passed: the decoded ciphertext bytes.
    Open(Vec<u8>),
    /// Caller is a party but the unlock time has not been reached.
    Locked { unlock_time: u64, now: u64 },
    /// Caller is neither sender nor receiver.
    Denied,
}

impl Reveal {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// Write boundary for capsule ledger entry operations.
///
/// Implementations must serialize appends so ids stay unique and gapless,
/// and every operation must commit fully or have no effect.
pub trait CapsuleWriter: Send + Sync {
    /// Create the empty store, exactly once.
    ///
    /// Fails with `Unauthorized` unless `caller` is the configured owner,
    /// and with `AlreadyInitialized` on any call after the first.
    fn init_storage(&self, caller: &Address) -> Result<(), LedgerError>;

    /// Append a capsule and return its assigned id.
    ///
    /// The recorded sender is always `caller` — there is no separately
    /// trusted sender argument. `unlock_time` must be strictly after the
    /// ledger clock's current second. `content` is stored in its lowercase
    /// hex wire form. `content_type` is stored unvalidated; it is
    /// informational only.
    fn create_capsule(
        &self,
        caller: &Address,
        receiver: &Address,
        unlock_time: u64,
        content: &[u8],
        content_type: ContentType,
    ) -> Result<u64, LedgerError>;
}

/// Read boundary for capsule ledger queries. All methods are side-effect
/// free and safe under unbounded concurrency.
pub trait CapsuleReader: Send + Sync {
    /// Number of capsules stored. Fails only with `NotInitialized`.
    fn capsule_count(&self) -> Result<u64, LedgerError>;

    /// Public metadata for the capsule at `id`. No authorization: metadata
    /// is visible to anyone. Fails with `NotFound` if `id` is out of range.
    fn capsule_meta(&self, id: u64) -> Result<CapsuleMeta, LedgerError>;

    /// Typed reveal: ciphertext bytes iff the time lock has expired and
    /// `caller` is the sender or receiver. `NotFound` for an out-of-range
    /// id regardless of authorization.
    fn reveal(&self, caller: &Address, id: u64) -> Result<Reveal, LedgerError>;

    /// Wire-compatible reveal: the stored hex string when the gate passes,
    /// the empty string otherwise.
    fn reveal_encrypted(&self, caller: &Address, id: u64) -> Result<String, LedgerError>;

    /// Wire-compatible reveal returning raw bytes; the exact inverse of the
    /// hex form stored at append time. Empty on a gate failure.
    fn reveal_encrypted_bytes(&self, caller: &Address, id: u64) -> Result<Vec<u8>, LedgerError>;
}
