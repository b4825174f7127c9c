//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.
//! Each command receives the storage client built here and writes its
//! results through the shared [`Formatter`].

use bucketops_core::{ColorMode, ConfigManager};
use bucketops_s3::S3Client;
use clap::builder::NonEmptyStringValueParser;
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod delete;
mod list;
mod list_filter;
mod upload;

/// bucketops - list, upload, filter and delete objects in an S3 bucket
///
/// Credentials are resolved from the environment, the shared AWS config
/// files, or the instance role.
#[derive(Parser, Debug)]
#[command(name = "bucketops")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Region to send requests to
    #[arg(long, global = true, env = "BUCKETOPS_REGION")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    #[arg(long, global = true, env = "BUCKETOPS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long, global = true, default_value = "false")]
    pub path_style: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinner
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress status lines and warnings (keys and errors are still printed)
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all objects in the bucket
    List(list::ListArgs),

    /// Upload a file to the bucket
    Upload(upload::UploadArgs),

    /// List objects whose key matches a pattern
    ListFilter(list_filter::ListFilterArgs),

    /// Delete objects whose key matches a pattern
    Delete(delete::DeleteArgs),
}

/// Bucket and key prefix shared by the listing commands
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Name of the bucket
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub bucket: String,

    /// Only consider keys starting with this prefix
    #[arg(long, default_value = "")]
    pub prefix: String,
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let Some(command) = cli.command else {
        let mut cmd = Cli::command();
        if let Err(e) = cmd.print_help() {
            tracing::debug!(error = %e, "failed to print help");
        }
        println!();
        return ExitCode::Success;
    };

    let config = match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => config,
        Err(e) => {
            Formatter::default().error(&format!("Failed to load configuration: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let output_config = OutputConfig {
        no_color: cli.no_color || config.defaults.color == ColorMode::Never,
        force_color: config.defaults.color == ColorMode::Always,
        no_progress: cli.no_progress || !config.defaults.progress,
        quiet: cli.quiet,
    };
    let formatter = Formatter::new(output_config.clone());

    let settings = config
        .s3
        .with_overrides(cli.region, cli.endpoint_url, cli.path_style);

    let client = match S3Client::new(&settings).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    match command {
        Commands::List(args) => list::execute(args, &client, &formatter).await,
        Commands::Upload(args) => upload::execute(args, &client, &formatter, &output_config).await,
        Commands::ListFilter(args) => list_filter::execute(args, &client, &formatter).await,
        Commands::Delete(args) => delete::execute(args, &client, &formatter).await,
    }
}
