use std::sync::RwLock;

use tracing::debug;

use capsule_codec::{hex_decode, hex_encode};
use capsule_types::{Address, Capsule, CapsuleMeta, ContentType};

use crate::clock::Clock;
use crate::error::LedgerError;
use crate::store::{CapsuleStore, LedgerSnapshot};
use crate::traits::{CapsuleReader, CapsuleWriter, Reveal};

/// In-memory capsule ledger for tests, local demos, and embedding.
///
/// The store lives behind a `RwLock`: appends take the write lock so id
/// assignment serializes, reads run concurrently under the read lock.
/// Every validation happens before the first mutation, so a failed append
/// leaves no trace.
pub struct InMemoryCapsuleLedger<C: Clock> {
    owner: Address,
    clock: C,
    inner: RwLock<Option<CapsuleStore>>,
}

impl<C: Clock> InMemoryCapsuleLedger<C> {
    /// A ledger owned by `owner`, not yet initialized.
    pub fn new(owner: Address, clock: C) -> Self {
        Self {
            owner,
            clock,
            inner: RwLock::new(None),
        }
    }

    /// Rebuild a ledger from a previously exported snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot, clock: C) -> Self {
        Self {
            owner: snapshot.store.owner,
            clock,
            inner: RwLock::new(Some(snapshot.store)),
        }
    }

    /// The identity allowed to call `init_storage`.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Whether `init_storage` has run.
    pub fn is_initialized(&self) -> bool {
        self.inner.read().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Export the full ledger state for host persistence.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let guard = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        let store = guard.as_ref().ok_or(LedgerError::NotInitialized)?;
        Ok(LedgerSnapshot {
            store: store.clone(),
        })
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&CapsuleStore) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let guard = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        let store = guard.as_ref().ok_or(LedgerError::NotInitialized)?;
        f(store)
    }

    /// Look up a capsule and evaluate the reveal gate against the clock.
    /// Returns the capsule together with the pass/fail verdict.
    fn gate<'a>(
        store: &'a CapsuleStore,
        caller: &Address,
        id: u64,
        now: u64,
    ) -> Result<(&'a Capsule, Reveal), LedgerError> {
        let capsule = store.get(id).ok_or(LedgerError::NotFound { id })?;

        let verdict = if !capsule.is_party(caller) {
            Reveal::Denied
        } else if !capsule.is_unlocked_at(now) {
            Reveal::Locked {
                unlock_time: capsule.unlock_time,
                now,
            }
        } else {
            let bytes = hex_decode(&capsule.encrypted_hex)
                .map_err(|e| LedgerError::InvalidEncoding(e.to_string()))?;
            Reveal::Open(bytes)
        };

        Ok((capsule, verdict))
    }
}

impl<C: Clock> CapsuleWriter for InMemoryCapsuleLedger<C> {
    fn init_storage(&self, caller: &Address) -> Result<(), LedgerError> {
        if *caller != self.owner {
            return Err(LedgerError::Unauthorized);
        }

        let mut guard = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;
        if guard.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }

        *guard = Some(CapsuleStore::new(self.owner));
        debug!(owner = %self.owner, "capsule store initialized");
        Ok(())
    }

    fn create_capsule(
        &self,
        caller: &Address,
        receiver: &Address,
        unlock_time: u64,
        content: &[u8],
        content_type: ContentType,
    ) -> Result<u64, LedgerError> {
        let mut guard = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;
        let store = guard.as_mut().ok_or(LedgerError::NotInitialized)?;

        let now = self.clock.now_secs();
        if unlock_time <= now {
            return Err(LedgerError::UnlockTimeNotFuture { unlock_time, now });
        }

        let id = store.next_id;
        store.capsules.push(Capsule {
            id,
            sender: *caller,
            receiver: *receiver,
            unlock_time,
            encrypted_hex: hex_encode(content),
            content_type,
        });
        store.next_id += 1;

        debug!(
            id,
            sender = %caller,
            receiver = %receiver,
            unlock_time,
            %content_type,
            "capsule appended"
        );
        Ok(id)
    }
}

impl<C: Clock> CapsuleReader for InMemoryCapsuleLedger<C> {
    fn capsule_count(&self) -> Result<u64, LedgerError> {
        self.with_store(|store| Ok(store.len()))
    }

    fn capsule_meta(&self, id: u64) -> Result<CapsuleMeta, LedgerError> {
        self.with_store(|store| {
            store
                .get(id)
                .map(Capsule::meta)
                .ok_or(LedgerError::NotFound { id })
        })
    }

    fn reveal(&self, caller: &Address, id: u64) -> Result<Reveal, LedgerError> {
        let now = self.clock.now_secs();
        self.with_store(|store| Self::gate(store, caller, id, now).map(|(_, verdict)| verdict))
    }

    fn reveal_encrypted(&self, caller: &Address, id: u64) -> Result<String, LedgerError> {
        let now = self.clock.now_secs();
        self.with_store(|store| {
            let (capsule, verdict) = Self::gate(store, caller, id, now)?;
            // Wire contract: any gate failure is the same empty answer.
            Ok(match verdict {
                Reveal::Open(_) => capsule.encrypted_hex.clone(),
                Reveal::Locked { .. } | Reveal::Denied => String::new(),
            })
        })
    }

    fn reveal_encrypted_bytes(&self, caller: &Address, id: u64) -> Result<Vec<u8>, LedgerError> {
        let now = self.clock.now_secs();
        self.with_store(|store| {
            let (_, verdict) = Self::gate(store, caller, id, now)?;
            Ok(match verdict {
                Reveal::Open(bytes) => bytes,
                Reveal::Locked { .. } | Reveal::Denied => Vec::new(),
            })
        })
    }
}

impl<C: Clock> std::fmt::Debug for InMemoryCapsuleLedger<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .inner
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(CapsuleStore::len));
        f.debug_struct("InMemoryCapsuleLedger")
            .field("owner", &self.owner)
            .field("capsule_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::Arc;
    use std::thread;

    const NOW: u64 = 1_700_000_000;

    fn owner() -> Address {
        Address::named("owner")
    }

    fn alice() -> Address {
        Address::named("alice")
    }

    fn bob() -> Address {
        Address::named("bob")
    }

    fn eve() -> Address {
        Address::named("eve")
    }

    /// An initialized ledger plus a handle to its clock.
    fn ledger() -> (InMemoryCapsuleLedger<ManualClock>, ManualClock) {
        let clock = ManualClock::new(NOW);
        let ledger = InMemoryCapsuleLedger::new(owner(), clock.clone());
        ledger.init_storage(&owner()).unwrap();
        (ledger, clock)
    }

    // -----------------------------------------------------------------------
    // Initialization lifecycle
    // -----------------------------------------------------------------------

    #[test]
    fn init_by_owner_succeeds_once() {
        let ledger = InMemoryCapsuleLedger::new(owner(), ManualClock::new(NOW));
        assert!(!ledger.is_initialized());
        ledger.init_storage(&owner()).unwrap();
        assert!(ledger.is_initialized());
        assert_eq!(ledger.capsule_count().unwrap(), 0);
    }

    #[test]
    fn init_by_non_owner_is_unauthorized() {
        let ledger = InMemoryCapsuleLedger::new(owner(), ManualClock::new(NOW));
        assert_eq!(
            ledger.init_storage(&alice()).unwrap_err(),
            LedgerError::Unauthorized
        );
        // The store must not have been allocated.
        assert!(!ledger.is_initialized());
    }

    #[test]
    fn double_init_fails() {
        let (ledger, _) = ledger();
        assert_eq!(
            ledger.init_storage(&owner()).unwrap_err(),
            LedgerError::AlreadyInitialized
        );
    }

    #[test]
    fn operations_before_init_fail() {
        let ledger = InMemoryCapsuleLedger::new(owner(), ManualClock::new(NOW));
        assert_eq!(
            ledger
                .create_capsule(&alice(), &bob(), NOW + 60, b"x", ContentType::Text)
                .unwrap_err(),
            LedgerError::NotInitialized
        );
        assert_eq!(
            ledger.capsule_count().unwrap_err(),
            LedgerError::NotInitialized
        );
        assert_eq!(
            ledger.capsule_meta(0).unwrap_err(),
            LedgerError::NotInitialized
        );
        assert_eq!(
            ledger.reveal_encrypted(&alice(), 0).unwrap_err(),
            LedgerError::NotInitialized
        );
        assert_eq!(ledger.snapshot().unwrap_err(), LedgerError::NotInitialized);
    }

    // -----------------------------------------------------------------------
    // Future-time enforcement
    // -----------------------------------------------------------------------

    #[test]
    fn unlock_time_must_be_strictly_future() {
        let (ledger, _) = ledger();
        for unlock in [0, NOW - 1, NOW] {
            assert_eq!(
                ledger
                    .create_capsule(&alice(), &bob(), unlock, b"x", ContentType::Text)
                    .unwrap_err(),
                LedgerError::UnlockTimeNotFuture {
                    unlock_time: unlock,
                    now: NOW
                }
            );
        }
        // The smallest future second is accepted.
        ledger
            .create_capsule(&alice(), &bob(), NOW + 1, b"x", ContentType::Text)
            .unwrap();
    }

    #[test]
    fn failed_append_has_no_effect() {
        let (ledger, _) = ledger();
        ledger
            .create_capsule(&alice(), &bob(), NOW + 60, b"x", ContentType::Text)
            .unwrap();
        let _ = ledger.create_capsule(&alice(), &bob(), NOW, b"y", ContentType::Text);
        assert_eq!(ledger.capsule_count().unwrap(), 1);
        let next = ledger
            .create_capsule(&alice(), &bob(), NOW + 60, b"z", ContentType::Text)
            .unwrap();
        assert_eq!(next, 1);
    }

    // -----------------------------------------------------------------------
    // Id assignment
    // -----------------------------------------------------------------------

    #[test]
    fn ids_are_gapless_in_call_order() {
        let (ledger, _) = ledger();
        for expected in 0..5u64 {
            let id = ledger
                .create_capsule(&alice(), &bob(), NOW + 60, b"x", ContentType::Text)
                .unwrap();
            assert_eq!(id, expected);
        }
        assert_eq!(ledger.capsule_count().unwrap(), 5);
    }

    #[test]
    fn concurrent_appends_assign_unique_gapless_ids() {
        let (ledger, _) = ledger();
        let ledger = Arc::new(ledger);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    (0..25)
                        .map(|_| {
                            ledger
                                .create_capsule(
                                    &alice(),
                                    &bob(),
                                    NOW + 60,
                                    b"x",
                                    ContentType::Text,
                                )
                                .unwrap()
                        })
                        .collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread should not panic"))
            .collect();
        ids.sort_unstable();

        let expected: Vec<u64> = (0..200).collect();
        assert_eq!(ids, expected);
        assert_eq!(ledger.capsule_count().unwrap(), 200);
    }

    // -----------------------------------------------------------------------
    // Metadata visibility
    // -----------------------------------------------------------------------

    #[test]
    fn metadata_is_public_and_ungated() {
        let (ledger, clock) = ledger();
        ledger
            .create_capsule(&alice(), &bob(), NOW + 60, b"x", ContentType::Text)
            .unwrap();

        // Before the unlock time, to anyone.
        let meta = ledger.capsule_meta(0).unwrap();
        assert_eq!(meta.sender, alice());
        assert_eq!(meta.receiver, bob());
        assert_eq!(meta.unlock_time, NOW + 60);
        assert_eq!(meta.content_type, ContentType::Text);

        // And unchanged after it.
        clock.advance(120);
        assert_eq!(ledger.capsule_meta(0).unwrap(), meta);
    }

    #[test]
    fn meta_out_of_range_is_not_found() {
        let (ledger, _) = ledger();
        assert_eq!(
            ledger.capsule_meta(0).unwrap_err(),
            LedgerError::NotFound { id: 0 }
        );
    }

    // -----------------------------------------------------------------------
    // Reveal gating: all four (time, authorization) quadrants
    // -----------------------------------------------------------------------

    #[test]
    fn reveal_gating_quadrants() {
        let (ledger, clock) = ledger();
        ledger
            .create_capsule(&alice(), &bob(), NOW + 60, b"\xde\xad\xbe\xef", ContentType::Text)
            .unwrap();

        // Locked + party.
        assert_eq!(ledger.reveal_encrypted(&bob(), 0).unwrap(), "");
        // Locked + stranger.
        assert_eq!(ledger.reveal_encrypted(&eve(), 0).unwrap(), "");

        clock.advance(60);

        // Unlocked + stranger.
        assert_eq!(ledger.reveal_encrypted(&eve(), 0).unwrap(), "");
        // Unlocked + party: receiver and sender both pass.
        assert_eq!(ledger.reveal_encrypted(&bob(), 0).unwrap(), "deadbeef");
        assert_eq!(ledger.reveal_encrypted(&alice(), 0).unwrap(), "deadbeef");
    }

    #[test]
    fn typed_reveal_distinguishes_the_cause() {
        let (ledger, clock) = ledger();
        ledger
            .create_capsule(&alice(), &bob(), NOW + 60, b"x", ContentType::Text)
            .unwrap();

        assert_eq!(
            ledger.reveal(&bob(), 0).unwrap(),
            Reveal::Locked {
                unlock_time: NOW + 60,
                now: NOW
            }
        );
        assert_eq!(ledger.reveal(&eve(), 0).unwrap(), Reveal::Denied);

        clock.advance(60);
        assert_eq!(ledger.reveal(&bob(), 0).unwrap(), Reveal::Open(b"x".to_vec()));
        assert_eq!(ledger.reveal(&eve(), 0).unwrap(), Reveal::Denied);
    }

    #[test]
    fn reveal_out_of_range_is_not_found_for_anyone() {
        let (ledger, _) = ledger();
        for caller in [alice(), eve()] {
            assert_eq!(
                ledger.reveal_encrypted(&caller, 7).unwrap_err(),
                LedgerError::NotFound { id: 7 }
            );
            assert_eq!(
                ledger.reveal_encrypted_bytes(&caller, 7).unwrap_err(),
                LedgerError::NotFound { id: 7 }
            );
        }
    }

    #[test]
    fn reveal_bytes_inverts_the_stored_hex() {
        let (ledger, clock) = ledger();
        let content: Vec<u8> = (0..=255).collect();
        ledger
            .create_capsule(&alice(), &bob(), NOW + 1, &content, ContentType::File)
            .unwrap();
        clock.advance(1);

        let hex = ledger.reveal_encrypted(&bob(), 0).unwrap();
        assert_eq!(hex.len(), content.len() * 2);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(ledger.reveal_encrypted_bytes(&bob(), 0).unwrap(), content);
    }

    #[test]
    fn reveal_bytes_empty_when_gated() {
        let (ledger, _) = ledger();
        ledger
            .create_capsule(&alice(), &bob(), NOW + 60, b"x", ContentType::Text)
            .unwrap();
        assert_eq!(ledger.reveal_encrypted_bytes(&bob(), 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn capsule_to_self_is_allowed() {
        let (ledger, clock) = ledger();
        ledger
            .create_capsule(&alice(), &alice(), NOW + 1, b"note", ContentType::Text)
            .unwrap();
        clock.advance(1);
        assert_eq!(
            ledger.reveal_encrypted_bytes(&alice(), 0).unwrap(),
            b"note"
        );
    }

    // -----------------------------------------------------------------------
    // End-to-end scenario with the content codec
    // -----------------------------------------------------------------------

    #[test]
    fn end_to_end_seal_wait_open() {
        let (ledger, clock) = ledger();
        let sealed = capsule_codec::encrypt(b"hello", "pw").unwrap();

        let id = ledger
            .create_capsule(&alice(), &bob(), NOW + 60, &sealed, ContentType::Text)
            .unwrap();
        assert_eq!(id, 0);

        assert_eq!(ledger.reveal_encrypted(&bob(), 0).unwrap(), "");

        clock.advance(60);
        let hex = ledger.reveal_encrypted(&bob(), 0).unwrap();
        let bytes = hex_decode(&hex).unwrap();
        assert_eq!(capsule_codec::decrypt(&bytes, "pw").unwrap(), b"hello");

        assert_eq!(ledger.reveal_encrypted(&eve(), 0).unwrap(), "");
    }

    // -----------------------------------------------------------------------
    // Snapshot persistence
    // -----------------------------------------------------------------------

    #[test]
    fn snapshot_roundtrip_preserves_state() {
        let (ledger, clock) = ledger();
        ledger
            .create_capsule(&alice(), &bob(), NOW + 60, b"first", ContentType::Text)
            .unwrap();
        ledger
            .create_capsule(&bob(), &alice(), NOW + 90, b"second", ContentType::Mixed)
            .unwrap();

        let snapshot = ledger.snapshot().unwrap();
        let restored = InMemoryCapsuleLedger::from_snapshot(snapshot, clock.clone());

        assert_eq!(restored.capsule_count().unwrap(), 2);
        assert_eq!(*restored.owner(), owner());
        assert_eq!(restored.capsule_meta(1).unwrap().receiver, alice());

        // Appends continue from the persisted counter.
        let id = restored
            .create_capsule(&alice(), &bob(), NOW + 60, b"third", ContentType::Text)
            .unwrap();
        assert_eq!(id, 2);

        // A restored ledger is already initialized.
        assert_eq!(
            restored.init_storage(&owner()).unwrap_err(),
            LedgerError::AlreadyInitialized
        );
    }
}
