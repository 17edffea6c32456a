use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::content::ContentType;

/// A time-locked record held by the capsule ledger.
///
/// Capsules are immutable once appended: there is no update or delete
/// operation anywhere in the system. The `encrypted_hex` field is the
/// lowercase hex wire form of the content codec's output and is opaque to
/// the ledger.
///
/// Field names match the wire contract exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capsule {
    /// Ledger-assigned identifier: 0-based, gapless, in creation order.
    pub id: u64,
    /// The authenticated creator of the capsule.
    pub sender: Address,
    /// The intended reader. May equal `sender` for a capsule to self.
    pub receiver: Address,
    /// Seconds since the UNIX epoch; strictly in the future at creation.
    pub unlock_time: u64,
    /// Lowercase, even-length hex ciphertext. Opaque to the ledger.
    pub encrypted_hex: String,
    /// Informational only; never interpreted by the ledger.
    pub content_type: ContentType,
}

impl Capsule {
    /// The public, ungated projection of this capsule.
    pub fn meta(&self) -> CapsuleMeta {
        CapsuleMeta {
            sender: self.sender,
            receiver: self.receiver,
            unlock_time: self.unlock_time,
            content_type: self.content_type,
        }
    }

    /// Whether `caller` is a party to this capsule (sender or receiver).
    pub fn is_party(&self, caller: &Address) -> bool {
        *caller == self.sender || *caller == self.receiver
    }

    /// Whether the time lock has expired at `now` (seconds since epoch).
    pub fn is_unlocked_at(&self, now: u64) -> bool {
        now >= self.unlock_time
    }
}

/// Public metadata for a capsule, returned without any gating.
///
/// Metadata visibility is deliberate: the application layer uses it to tell
/// "still locked" apart from "wrong passphrase" without a reveal attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsuleMeta {
    pub sender: Address,
    pub receiver: Address,
    pub unlock_time: u64,
    pub content_type: ContentType,
}
