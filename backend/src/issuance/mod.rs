//! Signed URL issuance, independent of the HTTP framework serving it
mod cors;
mod error;

use std::{borrow::Cow, sync::Arc};

use axum::{
    body::Bytes,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use common_types::SignedUrlsRequest;
use tracing::{info, instrument};
use validator::Validate;

pub use cors::{apply_cors, CorsPolicy};
pub use error::IssuanceError;

use crate::{
    media_storage::{KeyDeriver, SignedUrlPair, UrlIssuer},
    types::AppError,
};

/// Standard alphabet with optional padding
const TRANSPORT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// One incoming invocation of the issuance function
#[derive(Debug, Clone)]
pub struct IssuanceEvent {
    /// HTTP method of the invocation
    pub method: Method,
    /// Raw request body, possibly base64 encoded
    pub body: Bytes,
    /// Whether the transport delivered the body base64 encoded
    pub is_base64_encoded: bool,
}

/// Parses issuance requests and answers them with signed URL pairs
pub struct IssuanceEndpoint {
    key_deriver: KeyDeriver,
    url_issuer: Arc<dyn UrlIssuer>,
    cors: CorsPolicy,
}

impl IssuanceEndpoint {
    /// Creates a new issuance endpoint
    #[must_use]
    pub fn new(key_deriver: KeyDeriver, url_issuer: Arc<dyn UrlIssuer>, cors: CorsPolicy) -> Self {
        Self {
            key_deriver,
            url_issuer,
            cors,
        }
    }

    /// Handles a single invocation
    ///
    /// Preflight probes are answered before the body is looked at. Every other
    /// method is treated as an issuance request. All responses carry the CORS
    /// headers.
    #[instrument(skip(self, event), fields(method = %event.method))]
    pub async fn handle(&self, event: IssuanceEvent) -> Response {
        if event.method == Method::OPTIONS {
            return self.respond(StatusCode::OK);
        }

        match self.issue(&event).await {
            Ok(pair) => self.respond(Json(pair)),
            Err(err) => self.respond(AppError::from(err)),
        }
    }

    /// Answers an invocation whose body could not be read
    ///
    /// Preflights still succeed, everything else is rejected like any other
    /// unprocessable request.
    pub fn handle_unreadable(&self, method: &Method, error: IssuanceError) -> Response {
        if method == Method::OPTIONS {
            return self.respond(StatusCode::OK);
        }

        self.respond(AppError::from(error))
    }

    /// CORS policy applied to every response
    #[must_use]
    pub const fn cors(&self) -> &CorsPolicy {
        &self.cors
    }

    async fn issue(&self, event: &IssuanceEvent) -> Result<SignedUrlPair, IssuanceError> {
        let request = parse_body(&event.body, event.is_base64_encoded)?;
        request.validate()?;

        let key = self.key_deriver.derive(&request.client_filename);
        let pair = self.url_issuer.issue(&key, &request.mime_type).await?;

        info!("Issued signed URLs for {key} ({})", request.mime_type);

        Ok(pair)
    }

    fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        self.cors.apply(response.headers_mut());
        response
    }
}

/// Decodes the transport encoding, then parses the JSON request
///
/// Base64 bodies may be unpadded and may contain line breaks.
fn parse_body(body: &[u8], is_base64_encoded: bool) -> Result<SignedUrlsRequest, IssuanceError> {
    let normalized: Cow<'_, [u8]> = if is_base64_encoded {
        let compact: Vec<u8> = body
            .iter()
            .copied()
            .filter(|byte| !byte.is_ascii_whitespace())
            .collect();
        Cow::Owned(TRANSPORT_BASE64.decode(compact)?)
    } else {
        Cow::Borrowed(body)
    };

    Ok(serde_json::from_slice(&normalized)?)
}
