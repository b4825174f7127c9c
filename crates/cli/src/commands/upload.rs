//! upload command - Upload a local file to a key
//!
//! Upload failures are reported on stdout and do not change the exit code.

use std::path::PathBuf;

use bucketops_core::ObjectStore;
use clap::Args;
use clap::builder::NonEmptyStringValueParser;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// Upload a file to the bucket
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Name of the bucket
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub bucket: String,

    /// Local file path to upload
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Object key for the uploaded file
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub key: String,

    /// Content type (guessed from the file extension when omitted)
    #[arg(long)]
    pub content_type: Option<String>,
}

/// Execute the upload command
pub async fn execute(
    args: UploadArgs,
    store: &dyn ObjectStore,
    formatter: &Formatter,
    output_config: &OutputConfig,
) -> ExitCode {
    let content_type = args.content_type.clone().or_else(|| {
        mime_guess::from_path(&args.file)
            .first()
            .map(|m| m.essence_str().to_string())
    });

    let message = format!("Uploading {}", args.file.display());
    let spinner = ProgressBar::spinner(output_config, &message);
    let result = store
        .upload(&args.bucket, &args.file, &args.key, content_type)
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(receipt) => {
            tracing::debug!(
                size = receipt.size_bytes,
                etag = receipt.etag.as_deref().unwrap_or(""),
                "upload complete"
            );
            formatter.println(&format!(
                "Uploaded {} to s3://{}/{}",
                args.file.display(),
                receipt.bucket,
                receipt.key
            ));
        }
        Err(e) => {
            tracing::debug!(error = ?e, "upload failed");
            formatter.failure(&format!("Error uploading file: {e}"));
        }
    }

    ExitCode::Success
}
