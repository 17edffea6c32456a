use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::ClientError;

/// Content-derived token addressing a blob in the store.
///
/// Derived from the blob bytes with domain-separated BLAKE3, so the same
/// bytes always resolve to the same locator and uploads are idempotent.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locator(String);

impl Locator {
    /// Derive the locator for a byte sequence.
    pub fn for_bytes(bytes: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"capsule-blob-v1:");
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize().as_bytes()))
    }

    /// Wrap an externally issued locator token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Locator({}…)", &self.0[..8.min(self.0.len())])
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque byte storage for file attachments.
///
/// The ledger and codec never call this; only the application layer resolves
/// payload locators through it after a successful open. Implementations must
/// uphold:
/// - `get(put(bytes)) == bytes` for any byte sequence
/// - `put` is idempotent for identical bytes
/// - Missing locators fail with `BlobNotFound`, never an empty blob
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes and return their locator.
    async fn put(&self, bytes: Vec<u8>) -> Result<Locator, ClientError>;

    /// Fetch the bytes for a locator.
    async fn get(&self, locator: &Locator) -> Result<Vec<u8>, ClientError>;
}

/// In-memory, HashMap-based blob store for tests and embedding.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<Locator, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct blobs stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, bytes: Vec<u8>) -> Result<Locator, ClientError> {
        let locator = Locator::for_bytes(&bytes);
        let mut map = self.blobs.write().expect("lock poisoned");
        map.entry(locator.clone()).or_insert(bytes);
        Ok(locator)
    }

    async fn get(&self, locator: &Locator) -> Result<Vec<u8>, ClientError> {
        let map = self.blobs.read().expect("lock poisoned");
        map.get(locator)
            .cloned()
            .ok_or_else(|| ClientError::BlobNotFound(locator.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let store = InMemoryBlobStore::new();
        let locator = store.put(b"attachment bytes".to_vec()).await.unwrap();
        assert_eq!(store.get(&locator).await.unwrap(), b"attachment bytes");
    }

    #[tokio::test]
    async fn put_is_idempotent_for_identical_bytes() {
        let store = InMemoryBlobStore::new();
        let l1 = store.put(b"same".to_vec()).await.unwrap();
        let l2 = store.put(b"same".to_vec()).await.unwrap();
        assert_eq!(l1, l2);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn different_bytes_get_different_locators() {
        let store = InMemoryBlobStore::new();
        let l1 = store.put(b"aaa".to_vec()).await.unwrap();
        let l2 = store.put(b"bbb".to_vec()).await.unwrap();
        assert_ne!(l1, l2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn missing_locator_is_an_error() {
        let store = InMemoryBlobStore::new();
        let missing = Locator::from_token("feedface");
        assert_eq!(
            store.get(&missing).await.unwrap_err(),
            ClientError::BlobNotFound("feedface".into())
        );
    }

    #[test]
    fn locator_is_deterministic() {
        assert_eq!(Locator::for_bytes(b"x"), Locator::for_bytes(b"x"));
        assert_ne!(Locator::for_bytes(b"x"), Locator::for_bytes(b"y"));
    }
}
