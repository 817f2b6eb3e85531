use serde::{Deserialize, Serialize};

use crate::error::UploadFailure;

/// A completed upload. `url` is the read URL issued alongside the write URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub url: String,
}

/// Result of one file within a batch
#[derive(Debug)]
pub enum UploadOutcome {
    Uploaded(UploadResult),
    Failed(UploadFailure),
}

impl UploadOutcome {
    #[must_use]
    pub const fn uploaded(&self) -> Option<&UploadResult> {
        match self {
            Self::Uploaded(result) => Some(result),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&UploadFailure> {
        match self {
            Self::Uploaded(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Name of the file this outcome belongs to
    #[must_use]
    pub fn file_name(&self) -> &str {
        match self {
            Self::Uploaded(result) => &result.name,
            Self::Failed(failure) => &failure.file.name,
        }
    }
}
