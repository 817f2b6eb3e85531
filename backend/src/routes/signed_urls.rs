use std::sync::Arc;

use aide::{transform::TransformOperation, NoApi};
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method},
    response::Response,
    Extension, Json,
};
use common_types::{ErrorResponse, SignedUrlsRequest, SignedUrlsResponse};

use crate::issuance::{IssuanceEndpoint, IssuanceError, IssuanceEvent};

/// Request header through which the transport announces a base64 encoded body
pub const BODY_ENCODING_HEADER: &str = "content-transfer-encoding";

/// Largest request body buffered for an issuance request
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Issues a signed PUT/GET URL pair for a client-side upload
///
/// Accepts `{ clientFilename, mimeType }` and answers `{ putUrl, getUrl }`.
/// Any processing failure is a 400 with a generic message.
pub async fn handler(
    Extension(endpoint): Extension<Arc<IssuanceEndpoint>>,
    NoApi(method): NoApi<Method>,
    NoApi(headers): NoApi<HeaderMap>,
    body: Body,
) -> NoApi<Response> {
    let is_base64_encoded = headers
        .get(BODY_ENCODING_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("base64"));

    // Buffered here so oversized bodies still get CORS headers
    let body = match to_bytes(body, MAX_REQUEST_BODY_BYTES).await {
        Ok(body) => body,
        Err(e) => {
            return NoApi(endpoint.handle_unreadable(
                &method,
                IssuanceError::MalformedRequest(format!("Unreadable request body: {e}")),
            ))
        }
    };

    NoApi(
        endpoint
            .handle(IssuanceEvent {
                method,
                body,
                is_base64_encoded,
            })
            .await,
    )
}

pub fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Issue signed upload URLs")
        .description(
            "Returns a short-lived write URL bound to the declared content type and a read URL \
             for the same storage key. The body may be sent base64 encoded with \
             `Content-Transfer-Encoding: base64`.",
        )
        .input::<Json<SignedUrlsRequest>>()
        .response_with::<200, Json<SignedUrlsResponse>, _>(|res| {
            res.description("Signed write and read URLs")
        })
        .response_with::<400, Json<ErrorResponse>, _>(|res| {
            res.description("The request could not be processed")
        })
}
