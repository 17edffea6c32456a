use tracing::debug;

use capsule_client::{BlobStore, LedgerClient};
use capsule_codec::{open_payload, seal_payload, CapsulePayload, FileAttachment};
use capsule_ledger::Clock;
use capsule_types::{Address, CapsuleMeta, ContentType};

use crate::error::{SdkError, SdkResult};

/// A file to include in a capsule, by value.
#[derive(Clone, Debug)]
pub struct FileInput {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Everything needed to seal a new capsule.
#[derive(Clone, Debug)]
pub struct SealRequest {
    pub receiver: Address,
    /// Seconds since epoch; must be strictly in the ledger's future.
    pub unlock_time: u64,
    pub text: String,
    pub files: Vec<FileInput>,
}

impl SealRequest {
    /// A text-only request.
    pub fn text(receiver: Address, unlock_time: u64, text: impl Into<String>) -> Self {
        Self {
            receiver,
            unlock_time,
            text: text.into(),
            files: Vec::new(),
        }
    }

    fn content_type(&self) -> ContentType {
        match (self.text.is_empty(), self.files.is_empty()) {
            (false, true) => ContentType::Text,
            (true, false) => ContentType::File,
            _ => ContentType::Mixed,
        }
    }
}

/// Metadata plus the lock state as derived from the public metadata.
///
/// This is how the application distinguishes "still locked" from "wrong
/// passphrase" without relying on the deliberately opaque reveal result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapsuleStatus {
    pub id: u64,
    pub meta: CapsuleMeta,
    pub unlocked: bool,
    /// Zero once unlocked.
    pub seconds_remaining: u64,
}

/// A successfully opened capsule with its attachments resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenedCapsule {
    pub id: u64,
    pub payload: CapsulePayload,
    pub attachments: Vec<Attachment>,
}

/// One resolved attachment: the payload reference plus the fetched bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub info: FileAttachment,
    pub bytes: Vec<u8>,
}

/// High-level capsule flow over a ledger client and a blob store.
pub struct CapsuleVault<L, B, C> {
    ledger: L,
    blobs: B,
    clock: C,
}

impl<L, B, C> CapsuleVault<L, B, C>
where
    L: LedgerClient,
    B: BlobStore,
    C: Clock,
{
    pub fn new(ledger: L, blobs: B, clock: C) -> Self {
        Self {
            ledger,
            blobs,
            clock,
        }
    }

    /// One-time storage initialization, forwarded to the ledger.
    pub async fn init(&self, owner: &Address) -> SdkResult<()> {
        Ok(self.ledger.init_storage(owner).await?)
    }

    /// Seal a capsule: upload attachments, build and encrypt the payload,
    /// append to the ledger. Returns the assigned capsule id.
    pub async fn seal(
        &self,
        caller: &Address,
        passphrase: &str,
        request: SealRequest,
    ) -> SdkResult<u64> {
        if request.text.is_empty() && request.files.is_empty() {
            return Err(SdkError::EmptyCapsule);
        }

        let mut files = Vec::with_capacity(request.files.len());
        for file in &request.files {
            let locator = self.blobs.put(file.bytes.clone()).await?;
            files.push(FileAttachment {
                name: file.name.clone(),
                media_type: file.media_type.clone(),
                size: file.bytes.len() as u64,
                locator: locator.to_string(),
            });
        }

        let payload = CapsulePayload {
            text: request.text.clone(),
            files,
            timestamp: self.clock.now_secs(),
        };
        let sealed = seal_payload(&payload, passphrase)?;

        let id = self
            .ledger
            .create_capsule(
                caller,
                &request.receiver,
                request.unlock_time,
                &sealed,
                request.content_type(),
            )
            .await?;
        debug!(id, receiver = %request.receiver, "capsule sealed");
        Ok(id)
    }

    /// Public metadata plus the lock state relative to the vault clock.
    pub async fn status(&self, id: u64) -> SdkResult<CapsuleStatus> {
        let meta = self.ledger.capsule_meta(id).await?;
        let now = self.clock.now_secs();
        Ok(CapsuleStatus {
            id,
            meta,
            unlocked: now >= meta.unlock_time,
            seconds_remaining: meta.unlock_time.saturating_sub(now),
        })
    }

    /// Number of capsules on the ledger.
    pub async fn count(&self) -> SdkResult<u64> {
        Ok(self.ledger.capsule_count().await?)
    }

    /// Reveal, decrypt, and resolve a capsule's attachments.
    ///
    /// Fails with [`SdkError::CapsuleSealed`] when the reveal comes back
    /// empty (sealed output is never empty, so the two are unambiguous),
    /// and with a codec error when the passphrase is wrong.
    pub async fn open(
        &self,
        caller: &Address,
        id: u64,
        passphrase: &str,
    ) -> SdkResult<OpenedCapsule> {
        let sealed = self.ledger.reveal_encrypted_bytes(caller, id).await?;
        if sealed.is_empty() {
            return Err(SdkError::CapsuleSealed { id });
        }

        let payload = open_payload(&sealed, passphrase)?;

        let mut attachments = Vec::with_capacity(payload.files.len());
        for info in &payload.files {
            let bytes = self
                .blobs
                .get(&capsule_client::Locator::from_token(info.locator.clone()))
                .await?;
            attachments.push(Attachment {
                info: info.clone(),
                bytes,
            });
        }

        Ok(OpenedCapsule {
            id,
            payload,
            attachments,
        })
    }
}
