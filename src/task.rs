//! Task data structure.
//!
//! This module defines the core `Task` struct representing a single todo item.
//! Identity is the `id`; it is assigned at creation and never changes.

use serde::{Deserialize, Serialize};

/// A single todo item with text content and completion status.
///
/// The persisted form is exactly these three fields, so the on-disk blob is
/// a plain array of `{id, text, completed}` records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Create a new active task. Callers are responsible for trimming and
    /// rejecting blank text before construction.
    pub fn new(id: String, text: String) -> Self {
        Task {
            id,
            text,
            completed: false,
        }
    }
}
