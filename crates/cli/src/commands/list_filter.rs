//! list-filter command - List objects whose key matches a pattern

use bucketops_core::{KeyFilter, ObjectStore};
use clap::Args;

use super::TargetArgs;
use super::list::print_keys;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// List objects under a prefix whose key matches a regular expression
#[derive(Args, Debug)]
pub struct ListFilterArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Regular expression searched for anywhere in the key
    #[arg(long)]
    pub pattern: KeyFilter,
}

/// Execute the list-filter command
pub async fn execute(
    args: ListFilterArgs,
    store: &dyn ObjectStore,
    formatter: &Formatter,
) -> ExitCode {
    tracing::debug!(pattern = %args.pattern, "filtering keys");
    print_keys(store, &args.target, Some(&args.pattern), formatter).await
}
