//! list command - List objects under a prefix
//!
//! Keys are printed one per line as each page arrives.

use bucketops_core::{KeyFilter, ObjectStore, for_each_key};
use clap::Args;

use super::TargetArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// List all objects under a prefix
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the list command
pub async fn execute(args: ListArgs, store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    print_keys(store, &args.target, None, formatter).await
}

/// Print every key under the target prefix that passes `filter`
pub(super) async fn print_keys(
    store: &dyn ObjectStore,
    target: &TargetArgs,
    filter: Option<&KeyFilter>,
    formatter: &Formatter,
) -> ExitCode {
    let result = for_each_key(store, &target.bucket, &target.prefix, filter, |key| {
        formatter.result(key)
    })
    .await;

    match result {
        Ok(count) => {
            tracing::debug!(
                bucket = %target.bucket,
                prefix = %target.prefix,
                count,
                "listing complete"
            );
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!(
                "Failed to list objects in bucket '{}': {e}",
                target.bucket
            ));
            ExitCode::from_error(&e)
        }
    }
}
