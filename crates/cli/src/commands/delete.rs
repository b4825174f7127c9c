//! delete command - Delete objects whose key matches a pattern
//!
//! All matching keys are collected before anything is deleted. The batch is
//! then submitted in chunks sized to the provider's per-request limit.

use bucketops_core::{DeleteOutcome, Error, KeyFilter, ObjectStore, collect_matching, delete_keys};
use clap::Args;

use super::TargetArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete objects under a prefix whose key matches a regular expression
#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Regular expression searched for anywhere in the key
    #[arg(long)]
    pub pattern: KeyFilter,

    /// Only show what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the delete command
pub async fn execute(args: DeleteArgs, store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let bucket = &args.target.bucket;
    let prefix = &args.target.prefix;

    let matched = match collect_matching(store, bucket, prefix, &args.pattern).await {
        Ok(matched) => matched,
        Err(e) => return list_failed(bucket, &e, formatter),
    };

    if matched.is_empty() {
        formatter.println(&format!(
            "No objects matched pattern '{}' under prefix '{prefix}'.",
            args.pattern
        ));
        return ExitCode::Success;
    }

    if args.dry_run {
        for key in &matched {
            formatter.result(&format!("Would delete: {key}"));
        }
        return ExitCode::Success;
    }

    match delete_keys(store, bucket, &matched).await {
        Ok(outcome) => {
            report_deleted(bucket, &outcome, formatter);
            let unconfirmed = matched.len().saturating_sub(outcome.deleted.len());
            if unconfirmed > 0 {
                formatter.warning(&format!(
                    "{unconfirmed} matched object(s) were not confirmed deleted"
                ));
            }
            ExitCode::Success
        }
        Err(Error::PartialDelete { outcome, source }) => {
            report_deleted(bucket, &outcome, formatter);
            delete_failed(bucket, &source, formatter)
        }
        Err(e) => delete_failed(bucket, &e, formatter),
    }
}

fn report_deleted(bucket: &str, outcome: &DeleteOutcome, formatter: &Formatter) {
    formatter.println(&format!(
        "Deleted {} object(s) from bucket '{bucket}':",
        outcome.deleted.len()
    ));
    for key in &outcome.deleted {
        formatter.result(key);
    }
    for failure in &outcome.failed {
        formatter.warning(&format!(
            "Not deleted: {} ({}: {})",
            failure.key,
            failure.code.as_deref().unwrap_or("unknown"),
            failure.message.as_deref().unwrap_or("no message")
        ));
    }
}

fn list_failed(bucket: &str, e: &Error, formatter: &Formatter) -> ExitCode {
    formatter.error(&format!("Failed to list objects in bucket '{bucket}': {e}"));
    ExitCode::from_error(e)
}

fn delete_failed(bucket: &str, e: &Error, formatter: &Formatter) -> ExitCode {
    formatter.error(&format!("Failed to delete objects in bucket '{bucket}': {e}"));
    ExitCode::from_error(e)
}
