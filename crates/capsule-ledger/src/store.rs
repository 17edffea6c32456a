use serde::{Deserialize, Serialize};

use capsule_types::{Address, Capsule};

/// The singleton persisted state of a capsule ledger deployment.
///
/// Created exactly once by `init_storage`, keyed to the owning identity,
/// and thereafter mutated only by appends. `next_id` always equals
/// `capsules.len()`; the pair is kept explicit because it is part of the
/// persisted layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsuleStore {
    pub owner: Address,
    pub capsules: Vec<Capsule>,
    pub next_id: u64,
}

impl CapsuleStore {
    /// A fresh, empty store owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            capsules: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self, id: u64) -> Option<&Capsule> {
        self.capsules.get(id as usize)
    }

    pub fn len(&self) -> u64 {
        self.capsules.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.capsules.is_empty()
    }
}

/// Serializable snapshot of a ledger's full state, for host persistence.
///
/// The in-memory ledger can be exported to and rebuilt from this form; the
/// CLI uses it as its on-disk file format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub store: CapsuleStore,
}
