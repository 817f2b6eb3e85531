use axum::response::Response;
use http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN};
use http_body_util::BodyExt;
use serde_json::json;

use super::TEST_ORIGIN;

pub fn create_signed_urls_request(client_filename: &str, mime_type: &str) -> String {
    json!({
        "clientFilename": client_filename,
        "mimeType": mime_type
    })
    .to_string()
}

/// Read the whole response body as bytes
pub async fn read_response_body(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = read_response_body(response).await;
    serde_json::from_slice(&body).unwrap()
}

/// Assert the CORS headers every issuance response must carry
pub fn assert_cors_headers(response: &Response) {
    let headers = response.headers();
    assert_eq!(
        headers
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("missing Access-Control-Allow-Origin"),
        TEST_ORIGIN
    );
    assert_eq!(
        headers
            .get(ACCESS_CONTROL_ALLOW_HEADERS)
            .expect("missing Access-Control-Allow-Headers"),
        "Content-Type"
    );
}
