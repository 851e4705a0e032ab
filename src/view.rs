//! View derivation for the task list.
//!
//! This module turns `(tasks, filter)` into a declarative `ViewModel` that
//! the presentation layer renders verbatim: the visible rows, the counters
//! for the footer, and the placeholder policy when nothing is visible. It is
//! pure and holds no state of its own.

use crate::task::Task;

/// View-only predicate selecting which tasks are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// All filters in tab order.
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Display label for the filter tab.
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    /// Whether a task passes this filter.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    /// The next filter tab to the right, saturating at the last.
    pub fn next(self) -> Filter {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::Completed,
        }
    }

    /// The next filter tab to the left, saturating at the first.
    pub fn prev(self) -> Filter {
        match self {
            Filter::All => Filter::All,
            Filter::Active => Filter::All,
            Filter::Completed => Filter::Active,
        }
    }
}

/// Placeholder shown when the list has no visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// The whole collection is empty.
    NoTasks,
    /// Tasks exist but none are active.
    NoActive,
    /// Tasks exist but none are completed.
    NoCompleted,
}

impl Placeholder {
    pub fn message(self) -> &'static str {
        match self {
            Placeholder::NoTasks => "No tasks yet",
            Placeholder::NoActive => "No active tasks",
            Placeholder::NoCompleted => "No completed tasks",
        }
    }
}

/// A single visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub rows: Vec<TaskRow>,
    /// Count of active tasks over the FULL collection, filter-independent.
    pub remaining: usize,
    /// Any completed task in the full collection; drives the bulk-clear control.
    pub has_completed: bool,
    pub filter: Filter,
    pub placeholder: Option<Placeholder>,
    /// Footer (count + filter tabs + clear control) is suppressed only when
    /// the full collection is empty.
    pub show_footer: bool,
}

/// Derive the visible subset in original order.
pub fn visible<'a>(tasks: &'a [Task], filter: Filter) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filter.matches(t)).collect()
}

/// Derive the full view model from store state.
pub fn build_view(tasks: &[Task], filter: Filter) -> ViewModel {
    let rows: Vec<TaskRow> = visible(tasks, filter)
        .into_iter()
        .map(|t| TaskRow {
            id: t.id.clone(),
            text: t.text.clone(),
            completed: t.completed,
        })
        .collect();

    let placeholder = if tasks.is_empty() {
        Some(Placeholder::NoTasks)
    } else if rows.is_empty() {
        match filter {
            Filter::Completed => Some(Placeholder::NoCompleted),
            // `All` over a non-empty collection is never empty.
            _ => Some(Placeholder::NoActive),
        }
    } else {
        None
    };

    ViewModel {
        rows,
        remaining: tasks.iter().filter(|t| !t.completed).count(),
        has_completed: tasks.iter().any(|t| t.completed),
        filter,
        placeholder,
        show_footer: !tasks.is_empty(),
    }
}
