//! Client side of the signed-URL upload protocol
//!
//! Files are uploaded one at a time: a signed URL pair is requested from the
//! issuance function, the bytes go straight to the bucket through the PUT URL,
//! and the GET URL becomes the durable location of the file.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

pub mod batch;
pub mod error;
pub mod file;
pub mod orchestrator;
pub mod signed_url_api;
pub mod transfer;
pub mod types;

pub use batch::UploadBatchController;
pub use error::{UploadError, UploadFailure, UploadStage};
pub use file::LocalFile;
pub use orchestrator::UploadOrchestrator;
pub use types::{UploadOutcome, UploadResult};
