//! ObjectStore trait definition
//!
//! This trait defines the storage primitives the CLI needs: one listing page,
//! one single-object upload and one multi-object delete. It allows the
//! commands to be decoupled from the specific S3 SDK implementation.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Maximum number of keys accepted by a single S3 DeleteObjects request
pub const S3_MAX_DELETE_BATCH: usize = 1000;

/// One step of a paginated listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    /// Keys in provider order
    pub keys: Vec<String>,

    /// Token for the next page; `None` once the listing is exhausted
    pub continuation_token: Option<String>,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub bucket: String,
    pub key: String,
    pub size_bytes: u64,
    pub etag: Option<String>,
}

/// A key the provider refused to delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub key: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Provider response to a multi-object delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Keys confirmed deleted
    pub deleted: Vec<String>,

    /// Keys reported as failed
    pub failed: Vec<DeleteFailure>,
}

impl DeleteOutcome {
    /// Fold another batch outcome into this one
    pub fn merge(&mut self, other: DeleteOutcome) {
        self.deleted.extend(other.deleted);
        self.failed.extend(other.failed);
    }
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one page of keys under `prefix`, continuing from `continuation_token`
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage>;

    /// Upload a local file to `key`, replacing any existing object
    async fn upload(
        &self,
        bucket: &str,
        local_path: &Path,
        key: &str,
        content_type: Option<String>,
    ) -> Result<UploadReceipt>;

    /// Delete up to [`ObjectStore::max_delete_batch`] keys in one request
    async fn delete_batch(&self, bucket: &str, keys: &[String]) -> Result<DeleteOutcome>;

    /// Largest batch accepted by [`ObjectStore::delete_batch`]
    fn max_delete_batch(&self) -> usize {
        S3_MAX_DELETE_BATCH
    }
}
