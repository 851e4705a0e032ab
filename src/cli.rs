use std::path::PathBuf;

use clap::Parser;

/// Simple, file-backed todo list with a terminal UI.
/// Storage defaults to ~/.todo/todos.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "todo", version, about = "Single-pane todo list manager")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long)]
    pub db: Option<PathBuf>,
}
