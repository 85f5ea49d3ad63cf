//! Command implementations for the CLI interface.
//!
//! Each handler wraps one task-store operation: errors are reported on
//! stderr and turn into a non-zero exit, successes print a short line.

use std::path::Path;

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::store::{FileSlot, TaskRow, TaskStore};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive planner UI.
    Ui,

    /// Add a new task.
    Add {
        /// What to do, or what's happening.
        text: String,
        /// When: YYYY-MM-DDTHH:MM (local datetime-input format) or RFC 3339.
        /// Defaults to now.
        #[arg(long)]
        at: Option<String>,
    },

    /// List tasks in insertion order.
    List,

    /// Delete the task at a positional index (as shown by `list`).
    Delete {
        /// Zero-based position in the list.
        index: usize,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(slot_path: &Path) {
    if let Err(e) = run_tui(slot_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the slot.
pub fn cmd_add(store: &mut TaskStore<FileSlot>, text: String, at: Option<String>) {
    match store.add(&text, at.as_deref()) {
        Ok(task) => println!("Added task {}", task.id),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Print the task list as a fixed-width table.
pub fn cmd_list(store: &TaskStore<FileSlot>) {
    let rows = store.rows();
    if rows.is_empty() {
        println!("No tasks.");
        return;
    }
    print_rows(&rows);
}

/// Delete a task by its current positional index.
pub fn cmd_delete(store: &mut TaskStore<FileSlot>, index: usize) {
    let before = store.rows().len();
    if let Err(e) = store.delete(index) {
        eprintln!("Failed to save tasks: {e}");
        std::process::exit(1);
    }
    if store.rows().len() < before {
        println!("Deleted.");
    } else {
        println!("No task at index {index}.");
    }
}

/// Render display rows to stdout.
fn print_rows(rows: &[TaskRow]) {
    println!("{:<5} {:<5} {:<18} {}", "Idx", "ID", "When", "Text");
    for row in rows {
        println!("{:<5} {:<5} {:<18} {}", row.index, row.id, row.when, row.text);
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
