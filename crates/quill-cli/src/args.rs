//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

/// Quill: a plugin-driven chat command bot
#[derive(Parser, Debug)]
#[command(name = "quill", version, about)]
pub struct Cli {
    /// Path to the settings file (defaults to the quill.toml lookup)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Additional operator account ids, on top of the settings file
    #[arg(long = "operator")]
    pub operators: Vec<u64>,
}
