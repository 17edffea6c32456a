use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Informational classification of a capsule's decrypted payload.
///
/// The ledger stores and returns this value without interpreting it; only
/// the application layer uses it to pick a presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Text only.
    Text,
    /// File attachments only.
    File,
    /// Text plus file attachments.
    Mixed,
}

impl ContentType {
    /// The lowercase wire label (`"text"`, `"file"`, `"mixed"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::File => "file",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "file" => Ok(Self::File),
            "mixed" => Ok(Self::Mixed),
            other => Err(TypeError::UnknownContentType(other.to_string())),
        }
    }
}
