//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bucketops-core.
//! Credentials come from the SDK's default provider chain.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};

use bucketops_core::{
    DeleteFailure, DeleteOutcome, Error, ObjectPage, ObjectStore, Result, S3_MAX_DELETE_BATCH,
    S3Settings, UploadReceipt,
};

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from connection settings
    ///
    /// Region, endpoint and credentials not given in `settings` are resolved
    /// by the SDK from the environment, shared config files or instance role.
    pub async fn new(settings: &S3Settings) -> Result<Self> {
        settings.validate()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        if config.region().is_none() {
            tracing::warn!("no region configured; set --region, AWS_REGION or a profile region");
        }

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(settings.force_path_style)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }

    /// Wrap an already configured SDK client
    pub fn from_client(inner: aws_sdk_s3::Client) -> Self {
        Self { inner }
    }
}

/// Map an S3 error code to the matching error kind
pub(crate) fn error_from_code(code: Option<&str>, detail: String) -> Error {
    match code {
        Some(
            "AccessDenied" | "AllAccessDisabled" | "InvalidAccessKeyId" | "SignatureDoesNotMatch"
            | "ExpiredToken" | "InvalidToken" | "AccountProblem",
        ) => Error::Auth(detail),
        Some("NoSuchBucket" | "NoSuchKey" | "NotFound") => Error::NotFound(detail),
        _ => Error::Network(detail),
    }
}

/// Join the `Display` text of an error and its sources, skipping repeats
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(e) = source {
        let text = e.to_string();
        if !parts.contains(&text) {
            parts.push(text);
        }
        source = e.source();
    }
    parts.join(": ")
}

fn classify<E, R>(err: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    tracing::debug!(error = %DisplayErrorContext(&err), "request failed");
    let detail = match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        _ => describe(&err),
    };
    error_from_code(err.code(), detail)
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage> {
        let mut request = self.inner.list_objects_v2().bucket(bucket);

        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }

        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(classify)?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|o| o.key().map(str::to_string))
            .collect();

        let continuation_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(str::to_string)
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
        let local_error = |e: &dyn std::fmt::Display| {
            Error::LocalFile(format!("{}: {e}", local_path.display()))
        };

        // Open up front so missing or unreadable files are reported as local
        // errors rather than surfacing mid-request.
        let file = tokio::fs::File::open(local_path)
            .await
            .map_err(|e| local_error(&e))?;
        let metadata = file.metadata().await.map_err(|e| local_error(&e))?;
        if !metadata.is_file() {
            return Err(local_error(&"not a regular file"));
        }
        drop(file);

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| local_error(&describe(&e)))?;

        tracing::debug!(bucket, key, size = metadata.len(), "uploading object");

        let response = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .set_content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(classify)?;

        Ok(UploadReceipt {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size_bytes: metadata.len(),
            etag: response.e_tag().map(|e| e.trim_matches('"').to_string()),
        })
    }

    async fn delete_batch(&self, bucket: &str, keys: &[String]) -> Result<DeleteOutcome> {
        if keys.is_empty() {
            return Ok(DeleteOutcome::default());
        }

        let objects = keys
            .iter()
            .map(|k| ObjectIdentifier::builder().key(k).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::General(e.to_string()))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(false)
            .build()
            .map_err(|e| Error::General(e.to_string()))?;

        let response = self
            .inner
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(classify)?;

        // Only report keys that were part of this request.
        let submitted: HashSet<&str> = keys.iter().map(String::as_str).collect();
        let deleted = response
            .deleted()
            .iter()
            .filter_map(|d| d.key())
            .filter(|k| submitted.contains(k))
            .map(str::to_string)
            .collect();

        let failed = response
            .errors()
            .iter()
            .filter_map(|e| {
                e.key().map(|k| DeleteFailure {
                    key: k.to_string(),
                    code: e.code().map(str::to_string),
                    message: e.message().map(str::to_string),
                })
            })
            .collect();

        Ok(DeleteOutcome { deleted, failed })
    }

    fn max_delete_batch(&self) -> usize {
        S3_MAX_DELETE_BATCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Error;

    #[test]
    fn test_error_from_code_auth() {
        let codes = [
            "AccessDenied",
            "InvalidAccessKeyId",
            "SignatureDoesNotMatch",
            "ExpiredToken",
        ];
        for code in codes {
            let err = error_from_code(Some(code), format!("{code}: denied"));
            assert!(matches!(err, Error::Auth(_)), "{code}");
            assert_eq!(err.exit_code(), 4);
        }
    }

    #[test]
    fn test_error_from_code_not_found() {
        let err = error_from_code(Some("NoSuchBucket"), "NoSuchBucket: developer-task2".into());
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("developer-task2"));
    }

    #[test]
    fn test_error_from_code_fallback_is_network() {
        assert!(matches!(
            error_from_code(None, "dispatch failure".into()),
            Error::Network(_)
        ));
        assert!(matches!(
            error_from_code(Some("SlowDown"), "SlowDown".into()),
            Error::Network(_)
        ));
    }

    #[derive(Debug)]
    struct Wrapped(std::io::Error);

    impl std::fmt::Display for Wrapped {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("io error")
        }
    }

    impl std::error::Error for Wrapped {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_describe_joins_source_chain() {
        let err = Wrapped(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused",
        ));
        assert_eq!(describe(&err), "io error: Connection refused");
    }

    #[test]
    fn test_classify_keeps_debug_output_out_of_message() {
        let err: SdkError<ListObjectsV2Error, ()> =
            SdkError::construction_failure(Wrapped(std::io::Error::other("bad endpoint")));
        let classified = classify(err);

        assert!(matches!(classified, Error::Network(_)));
        let message = classified.to_string();
        assert!(message.contains("io error: bad endpoint"), "{message}");
        assert!(!message.contains("ConstructionFailure"), "{message}");
        assert!(!message.contains('{'), "{message}");
    }

    fn offline_client() -> S3Client {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .build();
        S3Client::from_client(aws_sdk_s3::Client::from_conf(config))
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_local_error() {
        let client = offline_client();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let err = client
            .upload("bucket", &missing, "key", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LocalFile(_)), "{err:?}");
        assert!(err.to_string().contains("missing.txt"));
    }

    #[tokio::test]
    async fn test_upload_directory_is_local_error() {
        let client = offline_client();
        let dir = tempfile::tempdir().unwrap();

        let err = client
            .upload("bucket", dir.path(), "key", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LocalFile(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_delete_empty_batch_makes_no_request() {
        let client = offline_client();
        let outcome = client.delete_batch("bucket", &[]).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::default());
    }

    #[test]
    fn test_max_delete_batch() {
        assert_eq!(offline_client().max_delete_batch(), 1000);
    }
}
