//! Quill bot binary
//!
//! Runs the command core over a local console session: lines typed on stdin
//! become messages from a synthetic user, replies render to stdout. The real
//! chat transport plugs in behind the same gateway seams.

mod args;
mod console;

use clap::Parser;

use quill_core::error::QuillResult;

use crate::args::Cli;

#[tokio::main]
async fn main() -> QuillResult<()> {
    // Initialize logging with environment-based filtering.
    // Set RUST_LOG=debug for verbose logging.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    console::run(cli).await
}
