//! Storage key derivation for uploads

use std::{fmt, sync::Arc};

use uuid::Uuid;

/// Prefix shared by every upload key, so bucket policies can target uploads as a whole
pub const UPLOAD_PREFIX: &str = "uploads";

/// Unique storage key of shape `uploads/<unique_id>/<client_filename>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    key: String,
    unique_id_len: usize,
}

impl StorageKey {
    /// The full key as stored in the bucket
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// The unique segment between the prefix and the filename
    #[must_use]
    pub fn unique_id(&self) -> &str {
        let start = UPLOAD_PREFIX.len() + 1;
        &self.key[start..start + self.unique_id_len]
    }

    /// The client filename, unchanged
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.key[UPLOAD_PREFIX.len() + self.unique_id_len + 2..]
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Source of identifiers that never repeat
pub trait UniqueIdSource: Send + Sync {
    /// Returns a fresh identifier, distinct from every previous one
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs in their 32-char hex form
pub struct UuidSource;

impl UniqueIdSource for UuidSource {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Derives storage keys from client filenames
pub struct KeyDeriver {
    ids: Arc<dyn UniqueIdSource>,
}

impl KeyDeriver {
    /// Creates a key deriver drawing unique segments from `ids`
    #[must_use]
    pub fn new(ids: Arc<dyn UniqueIdSource>) -> Self {
        Self { ids }
    }

    /// Derives a fresh key for `client_filename`
    #[must_use]
    pub fn derive(&self, client_filename: &str) -> StorageKey {
        let unique_id = self.ids.next_id();

        StorageKey {
            key: format!("{UPLOAD_PREFIX}/{unique_id}/{client_filename}"),
            unique_id_len: unique_id.len(),
        }
    }
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new(Arc::new(UuidSource))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::UniqueIdSource;

    /// Deterministic ids: `id-1`, `id-2`, ...
    #[derive(Default)]
    pub struct SequentialIdSource {
        counter: AtomicU64,
    }

    impl UniqueIdSource for SequentialIdSource {
        fn next_id(&self) -> String {
            format!("id-{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }
}
