use std::time::Duration;

use bytes::Bytes;
use reqwest::{header, Client};

use crate::error::UploadError;

/// Sends file bytes straight to the object store
#[async_trait::async_trait]
pub trait ObjectTransfer: Send + Sync {
    /// PUTs `content` to a signed write URL with the declared content type
    async fn put_object(
        &self,
        put_url: &str,
        content_type: &str,
        content: Bytes,
    ) -> Result<(), UploadError>;
}

/// Transfers over plain HTTP with no retries
pub struct HttpObjectTransfer {
    http_client: Client,
}

impl HttpObjectTransfer {
    /// Creates a transfer client. Without `timeout` a transfer runs until the
    /// transport gives up.
    ///
    /// # Errors
    ///
    /// If the HTTP client fails to be created
    pub fn new(timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
        })
    }
}

#[async_trait::async_trait]
impl ObjectTransfer for HttpObjectTransfer {
    async fn put_object(
        &self,
        put_url: &str,
        content_type: &str,
        content: Bytes,
    ) -> Result<(), UploadError> {
        let response = self
            .http_client
            .put(put_url)
            .header(header::CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UploadError::Transfer(format!("Transfer timed out: {e}"))
                } else {
                    UploadError::Transfer(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Transfer(format!(
                "Object store returned {status}"
            )));
        }

        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::{
        collections::{HashMap, HashSet},
        sync::Mutex,
    };

    use bytes::Bytes;

    use super::{ObjectTransfer, UploadError};

    /// In-memory object store keyed by URL path
    #[derive(Default)]
    pub struct MockObjectStore {
        objects: Mutex<HashMap<String, (String, Bytes)>>,
        failing_files: HashSet<String>,
    }

    impl MockObjectStore {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes transfers fail for any URL ending in `file_name`
        #[must_use]
        pub fn fail_for(mut self, file_name: &str) -> Self {
            self.failing_files.insert(file_name.to_string());
            self
        }

        /// Reads an object back through its GET URL
        ///
        /// # Panics
        ///
        /// If the lock is poisoned
        #[must_use]
        pub fn fetch(&self, get_url: &str) -> Option<(String, Bytes)> {
            self.objects.lock().unwrap().get(object_path(get_url)).cloned()
        }

        /// Number of stored objects
        ///
        /// # Panics
        ///
        /// If the lock is poisoned
        #[must_use]
        pub fn len(&self) -> usize {
            self.objects.lock().unwrap().len()
        }

        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    fn object_path(url: &str) -> &str {
        url.split_once('?').map_or(url, |(path, _)| path)
    }

    #[async_trait::async_trait]
    impl ObjectTransfer for MockObjectStore {
        async fn put_object(
            &self,
            put_url: &str,
            content_type: &str,
            content: Bytes,
        ) -> Result<(), UploadError> {
            let path = object_path(put_url);
            if self
                .failing_files
                .iter()
                .any(|name| path.ends_with(&format!("/{name}")))
            {
                return Err(UploadError::Transfer("Connection reset".to_string()));
            }

            self.objects
                .lock()
                .unwrap()
                .insert(path.to_string(), (content_type.to_string(), content));
            Ok(())
        }
    }
}
