//! S3-backed signed URL issuance
mod error;
pub mod key;

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use common_types::SignedUrlsResponse;
use tracing::debug;

pub use error::{BucketError, BucketResult};
pub use key::{KeyDeriver, StorageKey, UniqueIdSource, UuidSource};

/// Pair of signed URLs for one storage key
pub type SignedUrlPair = SignedUrlsResponse;

/// Write window for PUT URLs: 2 minutes
pub const DEFAULT_PUT_EXPIRY_SECS: u64 = 2 * 60;
/// Read window for GET URLs: 60 minutes
pub const DEFAULT_GET_EXPIRY_SECS: u64 = 60 * 60;
/// Cache directive the store answers GET URLs with: 7 days
pub const DEFAULT_GET_CACHE_CONTROL: &str = "max-age=604800";

/// Expiry and caching rules applied to every issued pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuancePolicy {
    /// How long the write URL stays valid
    pub put_expiry: Duration,
    /// How long the read URL stays valid
    pub get_expiry: Duration,
    /// `Cache-Control` the store sets when serving the read URL
    pub get_cache_control: String,
}

impl Default for IssuancePolicy {
    fn default() -> Self {
        Self {
            put_expiry: Duration::from_secs(DEFAULT_PUT_EXPIRY_SECS),
            get_expiry: Duration::from_secs(DEFAULT_GET_EXPIRY_SECS),
            get_cache_control: DEFAULT_GET_CACHE_CONTROL.to_string(),
        }
    }
}

/// Mints operation-scoped signed URLs against the object store
#[async_trait::async_trait]
pub trait UrlIssuer: Send + Sync {
    /// Issues a write URL bound to `key` and `mime_type`, and a read URL for `key`
    async fn issue(&self, key: &StorageKey, mime_type: &str) -> BucketResult<SignedUrlPair>;
}

/// Media storage client for S3 presigning
pub struct MediaStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    policy: IssuancePolicy,
}

impl MediaStorage {
    /// Creates a new media storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client, shared across requests
    /// * `bucket_name` - S3 bucket receiving uploads
    /// * `policy` - Expiry windows and cache directive for issued URLs
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String, policy: IssuancePolicy) -> Self {
        Self {
            s3_client,
            bucket_name,
            policy,
        }
    }

    fn presigning_config(expires_in: Duration) -> BucketResult<PresigningConfig> {
        PresigningConfig::expires_in(expires_in).map_err(|e| {
            BucketError::ConfigError(format!("Failed to create presigning config: {e}"))
        })
    }

    /// Generates a presigned URL for PUT operations
    ///
    /// The content type is part of the signature, so the store rejects a PUT
    /// carrying any other `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::ConfigError` if presigning config creation fails
    /// Returns `BucketError::SigningError` if presigned URL generation fails
    pub async fn generate_presigned_put_url(
        &self,
        key: &StorageKey,
        mime_type: &str,
    ) -> BucketResult<String> {
        let presigned_config = Self::presigning_config(self.policy.put_expiry)?;

        let presigned_url = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key.as_str())
            .content_type(mime_type)
            .presigned(presigned_config)
            .await
            .map_err(|e| {
                BucketError::SigningError(format!("Failed to generate presigned PUT URL: {e}"))
            })?;

        Ok(presigned_url.uri().to_string())
    }

    /// Generates a presigned URL for GET operations
    ///
    /// # Errors
    ///
    /// Returns `BucketError::ConfigError` if presigning config creation fails
    /// Returns `BucketError::SigningError` if presigned URL generation fails
    pub async fn generate_presigned_get_url(&self, key: &StorageKey) -> BucketResult<String> {
        let presigned_config = Self::presigning_config(self.policy.get_expiry)?;

        let presigned_url = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key.as_str())
            .response_cache_control(&self.policy.get_cache_control)
            .presigned(presigned_config)
            .await
            .map_err(|e| {
                BucketError::SigningError(format!("Failed to generate presigned GET URL: {e}"))
            })?;

        Ok(presigned_url.uri().to_string())
    }
}

#[async_trait::async_trait]
impl UrlIssuer for MediaStorage {
    async fn issue(&self, key: &StorageKey, mime_type: &str) -> BucketResult<SignedUrlPair> {
        let put_url = self.generate_presigned_put_url(key, mime_type).await?;
        let get_url = self.generate_presigned_get_url(key).await?;

        debug!(
            "Issued signed URLs for {} (put: {}s, get: {}s)",
            key,
            self.policy.put_expiry.as_secs(),
            self.policy.get_expiry.as_secs()
        );

        Ok(SignedUrlPair { put_url, get_url })
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use url::Url;

    use super::{BucketError, BucketResult, IssuancePolicy, SignedUrlPair, StorageKey, UrlIssuer};

    /// Issues unsigned URLs against `base_url`, carrying the binding as query parameters
    ///
    /// Put URLs carry `op=put`, `content-type` and `expires`; get URLs carry
    /// `op=get`, `expires` and `response-cache-control`.
    pub struct MockUrlIssuer {
        base_url: String,
        policy: IssuancePolicy,
        fail_with: Option<String>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockUrlIssuer {
        #[must_use]
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                base_url: base_url.into(),
                policy: IssuancePolicy::default(),
                fail_with: None,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        /// An issuer whose signing always fails with `message`
        #[must_use]
        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                fail_with: Some(message.into()),
                ..Self::new("http://localhost")
            }
        }

        /// Makes every issuance take at least `delay`
        #[must_use]
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Number of times `issue` was called
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn signed_url(&self, key: &StorageKey, params: &[(&str, String)]) -> BucketResult<String> {
            let mut url = Url::parse(&self.base_url)
                .map_err(|e| BucketError::ConfigError(format!("Invalid mock base URL: {e}")))?;
            url.set_path(key.as_str());
            url.query_pairs_mut().extend_pairs(params);
            Ok(url.into())
        }
    }

    #[async_trait::async_trait]
    impl UrlIssuer for MockUrlIssuer {
        async fn issue(&self, key: &StorageKey, mime_type: &str) -> BucketResult<SignedUrlPair> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(message) = &self.fail_with {
                return Err(BucketError::SigningError(message.clone()));
            }

            let put_url = self.signed_url(
                key,
                &[
                    ("op", "put".to_string()),
                    ("content-type", mime_type.to_string()),
                    ("expires", self.policy.put_expiry.as_secs().to_string()),
                ],
            )?;
            let get_url = self.signed_url(
                key,
                &[
                    ("op", "get".to_string()),
                    ("expires", self.policy.get_expiry.as_secs().to_string()),
                    (
                        "response-cache-control",
                        self.policy.get_cache_control.clone(),
                    ),
                ],
            )?;

            Ok(SignedUrlPair { put_url, get_url })
        }
    }
}
