//! bucketops-core: Core library for the bucketops S3 CLI
//!
//! This crate provides the core functionality for the CLI, including:
//! - Configuration loading
//! - Key pattern filtering
//! - Paginated listing and batched deletion
//! - ObjectStore trait for storage operations
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing the operations to be tested against mock stores.

pub mod config;
pub mod error;
pub mod filter;
pub mod ops;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{ColorMode, Config, ConfigManager, S3Settings};
pub use error::{Error, Result};
pub use filter::KeyFilter;
pub use ops::{collect_matching, delete_keys, for_each_key, pages};
pub use traits::{
    DeleteFailure, DeleteOutcome, ObjectPage, ObjectStore, S3_MAX_DELETE_BATCH, UploadReceipt,
};
