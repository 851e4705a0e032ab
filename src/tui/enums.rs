//! Enumerations for TUI state management.

/// Application screen for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    List,
    Help,
}

/// Which surface receives printable keys on the list screen.
#[derive(Clone, Copy, PartialEq)]
pub enum Focus {
    /// The new-task entry line at the top.
    Entry,
    /// The task list and its row gestures.
    List,
}
