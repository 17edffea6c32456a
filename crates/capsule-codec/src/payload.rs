use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// The transient, client-side payload sealed inside a capsule.
///
/// Never persisted in the clear: it exists only before sealing and after a
/// successful open. File bytes themselves live in the external blob store;
/// the payload carries locators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsulePayload {
    /// Free-form message text. May be empty when only files are attached.
    pub text: String,
    /// References to file attachments resolvable through the blob store.
    #[serde(default)]
    pub files: Vec<FileAttachment>,
    /// Client-side creation time, seconds since the UNIX epoch.
    pub timestamp: u64,
}

/// A file reference inside a [`CapsulePayload`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Original file name.
    pub name: String,
    /// Media type as reported at seal time, e.g. `image/png`.
    pub media_type: String,
    /// Size in bytes at seal time.
    pub size: u64,
    /// Blob store locator for the file bytes.
    pub locator: String,
}

impl CapsulePayload {
    /// A text-only payload.
    pub fn text_only(text: impl Into<String>, timestamp: u64) -> Self {
        Self {
            text: text.into(),
            files: Vec::new(),
            timestamp,
        }
    }

    /// Serialize to the JSON byte form that gets sealed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(|e| CodecError::Serialization(e.to_string()))
    }

    /// Parse from decrypted JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Serialization(e.to_string()))
    }
}
