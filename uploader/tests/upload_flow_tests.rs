mod common;

use std::sync::Arc;

use common::TestStack;
use pretty_assertions::assert_eq;
use uploader::{
    signed_url_api::{SignedUrlApi, SignedUrlApiClient},
    transfer::{HttpObjectTransfer, ObjectTransfer},
    LocalFile, UploadBatchController, UploadOrchestrator, UploadStage,
};

fn orchestrator(functions_root: &str) -> UploadOrchestrator {
    UploadOrchestrator::new(
        Arc::new(SignedUrlApiClient::new(functions_root).unwrap()),
        Arc::new(HttpObjectTransfer::new(None).unwrap()),
    )
}

#[tokio::test]
async fn test_uploaded_bytes_are_readable_at_result_url() {
    let stack = TestStack::start().await;
    let file = LocalFile::new("photo.png", "image/png", vec![7u8; 2048]);

    let result = orchestrator(&stack.functions_root)
        .upload_file(&file)
        .await
        .unwrap();

    assert_eq!(result.name, "photo.png");
    assert_eq!(result.mime_type, "image/png");
    assert!(result.url.starts_with(&stack.store_url));

    let response = reqwest::get(&result.url).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.headers()["content-type"], "image/png");
    let fetched = response.bytes().await.unwrap();
    assert_eq!(fetched.len() as u64, result.size);
    assert_eq!(fetched, file.content);
}

#[tokio::test]
async fn test_batch_with_rejected_filename() {
    let stack = TestStack::start().await;
    let mut controller = UploadBatchController::new(orchestrator(&stack.functions_root));

    let outcomes = controller
        .upload_all(vec![
            LocalFile::new("a.txt", "text/plain", "first"),
            // Path separators fail validation at the issuance endpoint
            LocalFile::new("nested/b.txt", "text/plain", "second"),
            LocalFile::new("c.json", "application/json", "{}"),
        ])
        .await;

    assert_eq!(outcomes.len(), 3);
    let failure = outcomes[1].failure().unwrap();
    assert_eq!(failure.file.name, "nested/b.txt");
    assert_eq!(failure.error.stage(), UploadStage::Issuance);
    assert!(failure
        .error
        .to_string()
        .contains("Request could not be processed."));

    let names: Vec<_> = controller.results().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "c.json"]);
    assert_eq!(stack.store.len(), 2);
    // Validation failures never reach the signer
    assert_eq!(stack.url_issuer.calls(), 2);
}

#[tokio::test]
async fn test_content_type_mismatch_is_a_transfer_failure() {
    let stack = TestStack::start().await;
    let api = SignedUrlApiClient::new(&stack.functions_root).unwrap();
    let urls = api.get_signed_urls("a.png", "image/png").await.unwrap();

    let err = HttpObjectTransfer::new(None)
        .unwrap()
        .put_object(&urls.put_url, "text/plain", "not a png".into())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), UploadStage::Transfer);
    assert!(err.to_string().contains("403"));
    assert_eq!(stack.store.len(), 0);
}

#[tokio::test]
async fn test_unreachable_issuance_endpoint() {
    // Nothing listens on port 9 locally
    let failure = orchestrator("http://127.0.0.1:9/")
        .upload_file(&LocalFile::new("a.txt", "text/plain", "data"))
        .await
        .unwrap_err();

    assert_eq!(failure.file.name, "a.txt");
    assert_eq!(failure.error.stage(), UploadStage::Issuance);
}

#[tokio::test]
async fn test_functions_root_without_trailing_slash() {
    let stack = TestStack::start().await;
    let root = stack.functions_root.trim_end_matches('/');

    let client = SignedUrlApiClient::new(root).unwrap();

    assert_eq!(client.signed_urls_url(), format!("{root}/get-signed-urls"));
    assert!(client.get_signed_urls("a.txt", "text/plain").await.is_ok());
}

#[tokio::test]
async fn test_file_from_disk_round_trip() {
    let stack = TestStack::start().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    tokio::fs::write(&path, "hello from disk").await.unwrap();

    let file = LocalFile::from_path(&path).await.unwrap();
    let result = orchestrator(&stack.functions_root)
        .upload_file(&file)
        .await
        .unwrap();

    assert_eq!(result.mime_type, "text/plain");
    let fetched = reqwest::get(&result.url).await.unwrap().text().await.unwrap();
    assert_eq!(fetched, "hello from disk");
}
