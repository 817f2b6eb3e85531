use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use uploader::{
    signed_url_api::SignedUrlApiClient, transfer::HttpObjectTransfer, LocalFile,
    UploadBatchController, UploadOrchestrator,
};

/// Uploads files straight to the bucket through signed URLs
#[derive(Debug, Parser)]
#[command(name = "uploader", version)]
struct Args {
    /// Base URL the issuance function is served under; `get-signed-urls` is
    /// appended to it, with a `/` in between if the root does not end in one
    #[arg(long, env = "FUNCTIONS_ROOT")]
    functions_root: String,

    /// Abort a transfer after this many seconds
    #[arg(long)]
    transfer_timeout_secs: Option<u64>,

    /// Files to upload, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let orchestrator = UploadOrchestrator::new(
        Arc::new(SignedUrlApiClient::new(&args.functions_root)?),
        Arc::new(HttpObjectTransfer::new(
            args.transfer_timeout_secs.map(Duration::from_secs),
        )?),
    );

    let mut files = Vec::with_capacity(args.files.len());
    let mut failed = 0;
    for path in &args.files {
        match LocalFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => {
                error!("Skipping file: {e}");
                failed += 1;
            }
        }
    }

    let mut controller = UploadBatchController::new(orchestrator);
    let outcomes = controller.upload_all(files).await;
    failed += outcomes.iter().filter(|o| o.failure().is_some()).count();

    for result in controller.results() {
        println!("{}", serde_json::to_string(result)?);
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} upload(s) failed", args.files.len());
    }

    Ok(())
}
