//! In-memory [`ObjectStore`] for tests
//!
//! Available to other crates through the `testing` feature.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::traits::{
    DeleteFailure, DeleteOutcome, ObjectPage, ObjectStore, S3_MAX_DELETE_BATCH, UploadReceipt,
};

#[derive(Debug, Clone, Copy)]
enum Fault {
    MissingBucket,
    Denied,
}

/// Sorted key space with S3-like pagination
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    content_types: Mutex<BTreeMap<String, Option<String>>>,
    page_size: usize,
    max_batch: usize,
    fault: Option<Fault>,
    protected: HashSet<String>,
    deletes_allowed: Option<usize>,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            objects: Mutex::new(keys.into_iter().map(|k| (k.into(), Vec::new())).collect()),
            content_types: Mutex::new(BTreeMap::new()),
            page_size: 1000,
            max_batch: S3_MAX_DELETE_BATCH,
            fault: None,
            protected: HashSet::new(),
            deletes_allowed: None,
            list_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Every request fails with `NoSuchBucket`
    pub fn missing_bucket() -> Self {
        Self {
            fault: Some(Fault::MissingBucket),
            ..Self::with_keys(Vec::<String>::new())
        }
    }

    /// Every request fails with `AccessDenied`
    pub fn denied() -> Self {
        Self {
            fault: Some(Fault::Denied),
            ..Self::with_keys(Vec::<String>::new())
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    /// Keys the store refuses to delete, reported per key as `AccessDenied`
    pub fn protect<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.protected = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Answer only the first `calls` delete requests; later ones fail
    pub fn deletes_allowed(mut self, calls: usize) -> Self {
        self.deletes_allowed = Some(calls);
        self
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Content type recorded by the last upload of `key`
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.content_types.lock().unwrap().get(key).cloned().flatten()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check(&self, bucket: &str) -> Result<()> {
        match self.fault {
            Some(Fault::MissingBucket) => Err(Error::NotFound(format!("NoSuchBucket: {bucket}"))),
            Some(Fault::Denied) => Err(Error::Auth("AccessDenied: Access Denied".into())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check(bucket)?;

        let objects = self.objects.lock().unwrap();
        // The token is the last key of the previous page.
        let mut keys: Vec<String> = objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .filter(|k| continuation_token.as_ref().is_none_or(|t| k.as_str() > t.as_str()))
            .take(self.page_size + 1)
            .cloned()
            .collect();

        let continuation_token = if keys.len() > self.page_size {
            keys.truncate(self.page_size);
            keys.last().cloned()
        } else {
            None
        };
        Ok(ObjectPage {
            keys,
            continuation_token,
        })
    }

    async fn upload(
        &self,
        bucket: &str,
        local_path: &Path,
        key: &str,
        content_type: Option<String>,
    ) -> Result<UploadReceipt> {
        let data = std::fs::read(local_path)
            .map_err(|e| Error::LocalFile(format!("{}: {e}", local_path.display())))?;
        self.check(bucket)?;

        let size_bytes = data.len() as u64;
        self.objects.lock().unwrap().insert(key.to_string(), data);
        self.content_types
            .lock()
            .unwrap()
            .insert(key.to_string(), content_type);
        Ok(UploadReceipt {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size_bytes,
            etag: None,
        })
    }

    async fn delete_batch(&self, bucket: &str, keys: &[String]) -> Result<DeleteOutcome> {
        assert!(!keys.is_empty(), "empty delete batch");
        assert!(keys.len() <= self.max_batch, "delete batch over limit");
        let call = self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check(bucket)?;
        if self.deletes_allowed.is_some_and(|allowed| call >= allowed) {
            return Err(Error::Network("connection reset by peer".into()));
        }

        let mut outcome = DeleteOutcome::default();
        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            if self.protected.contains(key) {
                outcome.failed.push(DeleteFailure {
                    key: key.clone(),
                    code: Some("AccessDenied".into()),
                    message: Some("Access Denied".into()),
                });
            } else if objects.remove(key.as_str()).is_some() {
                outcome.deleted.push(key.clone());
            }
        }
        Ok(outcome)
    }

    fn max_delete_batch(&self) -> usize {
        self.max_batch
    }
}
