use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    error::{UploadError, UploadFailure},
    file::LocalFile,
    signed_url_api::SignedUrlApi,
    transfer::ObjectTransfer,
    types::UploadResult,
};

/// Runs the two-step upload of a single file
pub struct UploadOrchestrator {
    signed_url_api: Arc<dyn SignedUrlApi>,
    object_transfer: Arc<dyn ObjectTransfer>,
}

impl UploadOrchestrator {
    #[must_use]
    pub fn new(
        signed_url_api: Arc<dyn SignedUrlApi>,
        object_transfer: Arc<dyn ObjectTransfer>,
    ) -> Self {
        Self {
            signed_url_api,
            object_transfer,
        }
    }

    /// Requests a signed URL pair for `file`, then PUTs its bytes to the write URL
    ///
    /// No step is retried. On success the read URL is returned as the file's location.
    ///
    /// # Errors
    ///
    /// Returns an `UploadFailure` naming the file if either step fails
    #[instrument(skip(self, file), fields(file = %file.name, size = file.size()))]
    pub async fn upload_file(&self, file: &LocalFile) -> Result<UploadResult, UploadFailure> {
        self.try_upload(file)
            .await
            .map_err(|error| UploadFailure {
                file: file.clone(),
                error,
            })
    }

    async fn try_upload(&self, file: &LocalFile) -> Result<UploadResult, UploadError> {
        let urls = self
            .signed_url_api
            .get_signed_urls(&file.name, &file.mime_type)
            .await?;
        debug!("Received signed URLs");

        self.object_transfer
            .put_object(&urls.put_url, &file.mime_type, file.content.clone())
            .await?;

        Ok(UploadResult {
            name: file.name.clone(),
            size: file.size(),
            mime_type: file.mime_type.clone(),
            url: urls.get_url,
        })
    }
}
