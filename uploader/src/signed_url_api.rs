use common_types::{ErrorResponse, SignedUrlsRequest, SignedUrlsResponse};
use reqwest::{header, Client};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::error::UploadError;

/// Name of the issuance function under the functions root
const SIGNED_URLS_FUNCTION: &str = "get-signed-urls";
/// Maximum number of idle connections to maintain per host
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;

/// Requests signed URL pairs from the issuance function
#[async_trait::async_trait]
pub trait SignedUrlApi: Send + Sync {
    /// Asks for a write/read URL pair for a file about to be uploaded
    async fn get_signed_urls(
        &self,
        client_filename: &str,
        mime_type: &str,
    ) -> Result<SignedUrlsResponse, UploadError>;
}

pub struct SignedUrlApiClient {
    signed_urls_url: String,
    http_client: ClientWithMiddleware,
}

impl SignedUrlApiClient {
    /// Creates a client for the issuance function served under `functions_root`
    ///
    /// # Errors
    ///
    /// If the HTTP client fails to be created
    pub fn new(functions_root: &str) -> reqwest::Result<Self> {
        let reqwest_client = Client::builder()
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .build()?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let separator = if functions_root.ends_with('/') { "" } else { "/" };

        Ok(Self {
            signed_urls_url: format!("{functions_root}{separator}{SIGNED_URLS_FUNCTION}"),
            http_client,
        })
    }

    #[must_use]
    pub fn signed_urls_url(&self) -> &str {
        &self.signed_urls_url
    }
}

#[async_trait::async_trait]
impl SignedUrlApi for SignedUrlApiClient {
    async fn get_signed_urls(
        &self,
        client_filename: &str,
        mime_type: &str,
    ) -> Result<SignedUrlsResponse, UploadError> {
        let request = SignedUrlsRequest {
            client_filename: client_filename.to_string(),
            mime_type: mime_type.to_string(),
        };

        let json_body = serde_json::to_string(&request)
            .map_err(|e| UploadError::Issuance(format!("Failed to serialize request: {e}")))?;

        let response = self
            .http_client
            .post(&self.signed_urls_url)
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(json_body)
            .send()
            .await
            .map_err(|e| UploadError::Issuance(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map_or_else(|_| "no error body".to_string(), |body| body.message);

            return Err(UploadError::Issuance(format!(
                "Issuance endpoint returned {status}: {message}"
            )));
        }

        response
            .json::<SignedUrlsResponse>()
            .await
            .map_err(|e| UploadError::Issuance(format!("Invalid issuance response: {e}")))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::{collections::HashSet, sync::Mutex};

    use common_types::{SignedUrlsRequest, SignedUrlsResponse};

    use super::{SignedUrlApi, UploadError};

    /// Issues URLs under `base_url`, numbering keys in call order
    pub struct MockSignedUrlApi {
        base_url: String,
        failing_files: HashSet<String>,
        requests: Mutex<Vec<SignedUrlsRequest>>,
    }

    impl MockSignedUrlApi {
        #[must_use]
        pub fn new(base_url: &str) -> Self {
            Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                failing_files: HashSet::new(),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Makes issuance fail for `client_filename`
        #[must_use]
        pub fn fail_for(mut self, client_filename: &str) -> Self {
            self.failing_files.insert(client_filename.to_string());
            self
        }

        /// Requests received so far, in order
        ///
        /// # Panics
        ///
        /// If the lock is poisoned
        #[must_use]
        pub fn requests(&self) -> Vec<SignedUrlsRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SignedUrlApi for MockSignedUrlApi {
        async fn get_signed_urls(
            &self,
            client_filename: &str,
            mime_type: &str,
        ) -> Result<SignedUrlsResponse, UploadError> {
            let call = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(SignedUrlsRequest {
                    client_filename: client_filename.to_string(),
                    mime_type: mime_type.to_string(),
                });
                requests.len()
            };

            if self.failing_files.contains(client_filename) {
                return Err(UploadError::Issuance(
                    "Issuance endpoint returned 400 Bad Request: Request could not be processed."
                        .to_string(),
                ));
            }

            let object_url = format!("{}/uploads/{call}/{client_filename}", self.base_url);
            Ok(SignedUrlsResponse {
                put_url: format!("{object_url}?op=put&content-type={mime_type}"),
                get_url: format!("{object_url}?op=get"),
            })
        }
    }
}
