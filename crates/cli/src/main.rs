//! bucketops - S3 bucket operations CLI
//!
//! Lists, uploads, filters and deletes objects in an S3-compatible bucket.

use bucketops::commands::{self, Cli};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays one result per line
    let filter = if cli.debug {
        EnvFilter::new("bucketops=debug,bucketops_core=debug,bucketops_s3=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
