use tracing::{error, info};

use crate::{
    file::LocalFile,
    orchestrator::UploadOrchestrator,
    types::{UploadOutcome, UploadResult},
};

/// Uploads selections of files one after another and keeps the successful results
pub struct UploadBatchController {
    orchestrator: UploadOrchestrator,
    results: Vec<UploadResult>,
}

impl UploadBatchController {
    #[must_use]
    pub const fn new(orchestrator: UploadOrchestrator) -> Self {
        Self {
            orchestrator,
            results: Vec::new(),
        }
    }

    /// Uploads `files` sequentially in the given order
    ///
    /// A failure is logged with the file name and does not stop the rest of the
    /// batch. Successful uploads are appended to [`Self::results`] in order.
    pub async fn upload_all(
        &mut self,
        files: impl IntoIterator<Item = LocalFile>,
    ) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::new();

        for file in files {
            match self.orchestrator.upload_file(&file).await {
                Ok(result) => {
                    info!("Uploaded {} ({} bytes) to {}", result.name, result.size, result.url);
                    self.results.push(result.clone());
                    outcomes.push(UploadOutcome::Uploaded(result));
                }
                Err(failure) => {
                    error!(
                        file = %failure.file.name,
                        stage = %failure.error.stage(),
                        "Upload failed: {}",
                        failure.error
                    );
                    outcomes.push(UploadOutcome::Failed(failure));
                }
            }
        }

        outcomes
    }

    /// Every successful upload so far, oldest first
    #[must_use]
    pub fn results(&self) -> &[UploadResult] {
        &self.results
    }
}
