//! # Synap - Personal Planner
//!
//! A small planner with a dashboard TUI and a file-backed task list.
//!
//! ## Key Features
//!
//! - **Dashboard Navigation**: fixed panels (dashboard, planner, about)
//!   switched by declared triggers, exactly one panel visible at a time
//! - **Persisted Task List**: ordered tasks (text + ISO-8601 timestamp)
//!   stored as a single JSON slot, rewritten whole on every change
//! - **Multiple Interfaces**: CLI subcommands for scripting + an interactive
//!   TUI for day-to-day use
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the planner UI
//! synap ui
//!
//! # Add a task via CLI
//! synap add "Call Bob" --at 2024-01-01T10:00
//!
//! # List tasks
//! synap list
//!
//! # Delete the first task
//! synap delete 0
//! ```
//!
//! Data is stored locally in `~/.synap/tasks.json`, overridable with `--db`.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod navigator;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use store::{FileSlot, TaskStore};

fn main() {
    let cli = Cli::parse();

    // Determine the task slot file.
    let slot_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let synap_dir = PathBuf::from(home).join(".synap");
        if let Err(e) = std::fs::create_dir_all(&synap_dir) {
            eprintln!("Failed to create synap directory {}: {}", synap_dir.display(), e);
            std::process::exit(1);
        }
        synap_dir.join("tasks.json")
    });

    match cli.command {
        Commands::Ui => cmd_ui(&slot_path),
        Commands::Add { text, at } => {
            let mut store = TaskStore::new(FileSlot::new(&slot_path));
            cmd_add(&mut store, text, at);
        }
        Commands::List => {
            let store = TaskStore::new(FileSlot::new(&slot_path));
            cmd_list(&store);
        }
        Commands::Delete { index } => {
            let mut store = TaskStore::new(FileSlot::new(&slot_path));
            cmd_delete(&mut store, index);
        }
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
