use std::path::PathBuf;

use thiserror::Error;

use crate::file::LocalFile;

/// Step of an upload that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum UploadStage {
    /// Reading the file from disk
    Read,
    /// Requesting signed URLs
    Issuance,
    /// Sending the bytes to the object store
    Transfer,
}

/// Errors that can end a single file's upload
#[derive(Error, Debug)]
pub enum UploadError {
    /// Network failure, non-2xx or unreadable response from the issuance endpoint
    #[error("Signed URL request failed: {0}")]
    Issuance(String),

    /// Network failure, abort, timeout or non-2xx from the object store
    #[error("Direct transfer failed: {0}")]
    Transfer(String),

    /// The local file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    #[must_use]
    pub const fn stage(&self) -> UploadStage {
        match self {
            Self::Issuance(_) => UploadStage::Issuance,
            Self::Transfer(_) => UploadStage::Transfer,
            Self::Read { .. } => UploadStage::Read,
        }
    }
}

/// A failed upload, with the file it was attempted for
#[derive(Error, Debug)]
#[error("Upload of {} failed: {error}", .file.name)]
pub struct UploadFailure {
    pub file: LocalFile,
    #[source]
    pub error: UploadError,
}
