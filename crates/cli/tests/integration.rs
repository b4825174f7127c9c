//! Integration tests for the bucketops CLI
//!
//! These tests require a running S3-compatible server and an existing bucket.
//! Credentials are picked up from the usual AWS environment variables.
//!
//! Run with:
//! ```bash
//! # Start an S3-compatible server and create the bucket
//! docker run -d --name minio -p 9000:9000 \
//!     -e MINIO_ROOT_USER=accesskey -e MINIO_ROOT_PASSWORD=secretkey \
//!     minio/minio server /data
//!
//! # Run tests
//! AWS_ACCESS_KEY_ID=accesskey AWS_SECRET_ACCESS_KEY=secretkey AWS_REGION=us-east-1 \
//! TEST_S3_ENDPOINT=http://localhost:9000 TEST_S3_BUCKET=bucketops-test \
//!     cargo test --features integration
//! ```

#![cfg(feature = "integration")]

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the bucketops binary
fn bucketops_binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_bucketops"))
}

/// Get S3 test configuration from environment: (bucket, optional endpoint)
fn get_test_config() -> Option<(String, Option<String>)> {
    let bucket = std::env::var("TEST_S3_BUCKET").ok()?;
    let endpoint = std::env::var("TEST_S3_ENDPOINT").ok();
    Some((bucket, endpoint))
}

/// Run bucketops with an isolated config directory
fn run(args: &[&str], config_dir: &Path, endpoint: Option<&str>) -> Output {
    let mut cmd = Command::new(bucketops_binary());
    cmd.args(args).arg("--no-progress").arg("--no-color");
    if let Some(endpoint) = endpoint {
        cmd.args(["--endpoint-url", endpoint, "--path-style"]);
    }
    cmd.env("BUCKETOPS_CONFIG_DIR", config_dir);
    cmd.output().expect("Failed to execute bucketops command")
}

/// Generate unique suffix for test resources
fn uuid_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{:x}", duration.as_nanos() % 0xFFFFFFFF)
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

struct Fixture {
    bucket: String,
    endpoint: Option<String>,
    prefix: String,
    config_dir: TempDir,
    files: TempDir,
}

impl Fixture {
    fn new(name: &str) -> Option<Self> {
        let (bucket, endpoint) = get_test_config()?;
        Some(Self {
            bucket,
            endpoint,
            prefix: format!("bucketops-it-{name}-{}/", uuid_suffix()),
            config_dir: tempfile::tempdir().ok()?,
            files: tempfile::tempdir().ok()?,
        })
    }

    fn run(&self, args: &[&str]) -> Output {
        run(args, self.config_dir.path(), self.endpoint.as_deref())
    }

    fn key(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    fn upload(&self, name: &str, content: &str) -> Output {
        let path = self.files.path().join(name.replace('/', "_"));
        std::fs::write(&path, content).expect("write fixture file");
        self.run(&[
            "upload",
            "--bucket",
            &self.bucket,
            "--file",
            path.to_str().unwrap(),
            "--key",
            &self.key(name),
        ])
    }

    fn list(&self) -> Vec<String> {
        let output = self.run(&["list", "--bucket", &self.bucket, "--prefix", &self.prefix]);
        assert!(
            output.status.success(),
            "list failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        stdout_lines(&output)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = self.run(&[
            "delete",
            "--bucket",
            &self.bucket,
            "--prefix",
            &self.prefix,
            "--pattern",
            ".",
        ]);
    }
}

macro_rules! fixture {
    ($name:expr) => {
        match Fixture::new($name) {
            Some(f) => f,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        }
    };
}

#[test]
fn test_upload_then_list_includes_key_once() {
    let fx = fixture!("upload");

    let output = fx.upload("lcloud_task_file.txt", "task");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(&format!("s3://{}/{}", fx.bucket, fx.key("lcloud_task_file.txt"))),
        "unexpected upload output: {stdout}"
    );

    // Overwrite keeps a single key
    assert!(fx.upload("lcloud_task_file.txt", "task v2").status.success());

    let keys = fx.list();
    let hits = keys
        .iter()
        .filter(|k| **k == fx.key("lcloud_task_file.txt"))
        .count();
    assert_eq!(hits, 1, "listing: {keys:?}");
}

#[test]
fn test_list_filter_and_delete_scenario() {
    let fx = fixture!("scenario");
    for name in ["TIE-rp/test1.txt", "TIE-rp/upload2.txt", "other/test3.txt"] {
        assert!(fx.upload(name, name).status.success());
    }

    let tie_prefix = fx.key("TIE-rp/");
    let output = fx.run(&[
        "list-filter",
        "--bucket",
        &fx.bucket,
        "--prefix",
        &tie_prefix,
        "--pattern",
        ".*test.*",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec![fx.key("TIE-rp/test1.txt")]);

    let output = fx.run(&[
        "delete",
        "--bucket",
        &fx.bucket,
        "--prefix",
        &tie_prefix,
        "--pattern",
        ".*/test.*",
    ]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert!(lines[0].starts_with("Deleted 1 object(s)"), "{lines:?}");
    assert_eq!(lines[1..], [fx.key("TIE-rp/test1.txt")]);

    let mut remaining = fx.list();
    remaining.sort();
    let mut expected = vec![fx.key("TIE-rp/upload2.txt"), fx.key("other/test3.txt")];
    expected.sort();
    assert_eq!(remaining, expected);
}

#[test]
fn test_delete_twice_second_run_matches_nothing() {
    let fx = fixture!("idempotent");
    assert!(fx.upload("a.log", "a").status.success());
    assert!(fx.upload("b.log", "b").status.success());

    let args: [&str; 7] = [
        "delete",
        "--bucket",
        &fx.bucket,
        "--prefix",
        &fx.prefix,
        "--pattern",
        "\\.log$",
    ];
    let first = fx.run(&args);
    assert!(first.status.success());
    assert!(stdout_lines(&first)[0].starts_with("Deleted 2 object(s)"));

    let second = fx.run(&args);
    assert!(second.status.success());
    assert!(stdout_lines(&second)[0].starts_with("No objects matched"));
}

#[test]
fn test_upload_missing_file_reports_and_exits_zero() {
    let fx = fixture!("missing");
    let missing = fx.files.path().join("does-not-exist.txt");

    let output = fx.run(&[
        "upload",
        "--bucket",
        &fx.bucket,
        "--file",
        missing.to_str().unwrap(),
        "--key",
        &fx.key("x.txt"),
    ]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error uploading file"), "{stdout}");
    assert!(stdout.contains("does-not-exist.txt"), "{stdout}");
}

#[test]
fn test_list_missing_bucket_fails_with_message() {
    let fx = fixture!("nobucket");
    let bucket = format!("bucketops-missing-{}", uuid_suffix());

    let output = fx.run(&["list", "--bucket", &bucket]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&bucket), "{stderr}");
}
