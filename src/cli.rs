use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed personal planner.
/// Storage defaults to ~/.synap/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "synap", version, about = "Personal planner with a dashboard TUI")]
pub struct Cli {
    /// Path to the JSON task slot file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
