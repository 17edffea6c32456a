use std::sync::Arc;

use async_trait::async_trait;

use capsule_ledger::{CapsuleReader, CapsuleWriter};
use capsule_types::{Address, CapsuleMeta, ContentType};

use crate::error::ClientError;

/// Client boundary for a capsule ledger deployment.
///
/// Entry calls are atomic and ordered per writer: a submitted call either
/// takes full effect on the confirmed ledger state or none. The `caller`
/// passed to each method is the authenticated identity of the submitting
/// party — implementations must bind it to a real credential (a transaction
/// signature, an authenticated session) rather than trusting a
/// client-supplied string.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit the one-time storage initialization.
    async fn init_storage(&self, caller: &Address) -> Result<(), ClientError>;

    /// Submit a capsule append; resolves with the assigned id once the
    /// effect is confirmed.
    async fn create_capsule(
        &self,
        caller: &Address,
        receiver: &Address,
        unlock_time: u64,
        content: &[u8],
        content_type: ContentType,
    ) -> Result<u64, ClientError>;

    /// Query the number of stored capsules.
    async fn capsule_count(&self) -> Result<u64, ClientError>;

    /// Query a capsule's public metadata.
    async fn capsule_meta(&self, id: u64) -> Result<CapsuleMeta, ClientError>;

    /// Query the gated reveal; empty string when the gate holds.
    async fn reveal_encrypted(&self, caller: &Address, id: u64) -> Result<String, ClientError>;

    /// Query the gated reveal as raw bytes; empty when the gate holds.
    async fn reveal_encrypted_bytes(
        &self,
        caller: &Address,
        id: u64,
    ) -> Result<Vec<u8>, ClientError>;
}

/// A [`LedgerClient`] running directly against an in-process ledger.
///
/// The degenerate transport: calls go straight through, so "confirmed"
/// means "returned". Used by tests, the CLI, and embedded deployments.
pub struct DirectLedgerClient<L> {
    ledger: Arc<L>,
}

impl<L> DirectLedgerClient<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// The wrapped ledger.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }
}

impl<L> Clone for DirectLedgerClient<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

#[async_trait]
impl<L> LedgerClient for DirectLedgerClient<L>
where
    L: CapsuleWriter + CapsuleReader,
{
    async fn init_storage(&self, caller: &Address) -> Result<(), ClientError> {
        Ok(self.ledger.init_storage(caller)?)
    }

    async fn create_capsule(
        &self,
        caller: &Address,
        receiver: &Address,
        unlock_time: u64,
        content: &[u8],
        content_type: ContentType,
    ) -> Result<u64, ClientError> {
        Ok(self
            .ledger
            .create_capsule(caller, receiver, unlock_time, content, content_type)?)
    }

    async fn capsule_count(&self) -> Result<u64, ClientError> {
        Ok(self.ledger.capsule_count()?)
    }

    async fn capsule_meta(&self, id: u64) -> Result<CapsuleMeta, ClientError> {
        Ok(self.ledger.capsule_meta(id)?)
    }

    async fn reveal_encrypted(&self, caller: &Address, id: u64) -> Result<String, ClientError> {
        Ok(self.ledger.reveal_encrypted(caller, id)?)
    }

    async fn reveal_encrypted_bytes(
        &self,
        caller: &Address,
        id: u64,
    ) -> Result<Vec<u8>, ClientError> {
        Ok(self.ledger.reveal_encrypted_bytes(caller, id)?)
    }
}
