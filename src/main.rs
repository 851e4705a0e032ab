//! # todo - Single-pane task list manager
//!
//! A small terminal todo list: add, edit, complete, filter, and delete short
//! text items, with state persisted across sessions in a local JSON file.
//!
//! ## Key behaviours
//!
//! - **Immediate persistence**: every change is written to disk before the
//!   next frame renders, so the file and the screen never disagree.
//! - **Filters**: All / Active / Completed views over one ordered list.
//! - **Inline editing**: edit a task's text in place; Enter saves, Esc
//!   discards, moving away saves.
//! - **Fail-soft storage**: a missing or corrupt task file starts an empty
//!   list instead of an error.
//!
//! ## Quick start
//!
//! ```bash
//! # Launch the UI (stores tasks in ~/.todo/todos.json)
//! todo
//!
//! # Use a different task file
//! todo --db ./project-todos.json
//! ```
//!
//! Data is a plain JSON array of `{id, text, completed}` records, friendly
//! to version control and hand editing.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod controller;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
}

use cli::Cli;
use tui::run::run_tui;

fn main() {
    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let todo_dir = PathBuf::from(home).join(".todo");
        if let Err(e) = std::fs::create_dir_all(&todo_dir) {
            eprintln!("Failed to create todo directory {}: {}", todo_dir.display(), e);
            std::process::exit(1);
        }
        todo_dir.join("todos.json")
    });

    if let Err(e) = run_tui(&db_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}
