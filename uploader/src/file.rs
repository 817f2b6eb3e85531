use std::path::Path;

use bytes::Bytes;

use crate::error::UploadError;

/// A file selected for upload, held fully in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// File name as presented to the issuance endpoint
    pub name: String,
    /// Declared content type, sent at issuance and on the PUT
    pub mime_type: String,
    pub content: Bytes,
}

impl LocalFile {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    /// Size of the content in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Reads a file from disk, guessing its content type from the extension
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Read` if the file cannot be read
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        let mime_type = mime_guess::from_path(path).first_or_octet_stream();

        Ok(Self::new(name, mime_type.essence_str(), content))
    }
}
