//! Intent dispatch and the inline-edit state machine.
//!
//! The controller sits between the presentation surface and the store. User
//! gestures arrive as explicit `Intent` values through a single `dispatch`
//! function, which keeps the whole interaction loop testable without a
//! terminal. It also owns the active filter and the at-most-one edit session.

use std::io;
use std::path::Path;

use crate::store::TaskStore;
use crate::view::{build_view, Filter, ViewModel};

/// A user gesture translated into a store-facing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SubmitNew(String),
    ToggleTask(String),
    DeleteTask(String),
    StartEdit(String),
    CommitEdit { id: String, text: String },
    CancelEdit(String),
    SelectFilter(Filter),
    ClearCompleted,
}

/// Transient state for one in-progress text edit.
///
/// Holds the text as it was when the edit started, so a cancel can be
/// verified against it and the working copy lives in the input widget.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub id: String,
    pub original: String,
}

/// Owns the store, the active filter, and the edit session.
pub struct Controller {
    store: TaskStore,
    filter: Filter,
    edit: Option<EditSession>,
}

impl Controller {
    /// Open the store at the given path and start with the default filter.
    pub fn open(path: &Path) -> Self {
        Controller {
            store: TaskStore::open(path),
            filter: Filter::default(),
            edit: None,
        }
    }

    /// Derive the view model for the current state.
    pub fn view(&self) -> ViewModel {
        build_view(self.store.tasks(), self.filter)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// The active edit session, if any.
    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Apply one intent. Invalid input and stale ids are benign no-ops;
    /// only persistence failures surface as errors.
    pub fn dispatch(&mut self, intent: Intent) -> io::Result<()> {
        match intent {
            Intent::SubmitNew(text) => {
                self.store.add(&text)?;
            }
            Intent::ToggleTask(id) => {
                self.store.toggle(&id)?;
            }
            Intent::DeleteTask(id) => {
                // Deleting the row under edit orphans the session; drop it.
                if self.edit.as_ref().is_some_and(|s| s.id == id) {
                    self.edit = None;
                }
                self.store.remove(&id)?;
            }
            Intent::StartEdit(id) => self.start_edit(&id),
            Intent::CommitEdit { id, text } => {
                // Take the session so a second commit for the same
                // interaction (confirm key followed by focus loss) is a no-op.
                if self.edit.as_ref().is_some_and(|s| s.id == id) {
                    self.edit = None;
                    self.store.edit(&id, &text)?;
                }
            }
            Intent::CancelEdit(id) => {
                if self.edit.as_ref().is_some_and(|s| s.id == id) {
                    self.edit = None;
                }
            }
            Intent::SelectFilter(filter) => self.filter = filter,
            Intent::ClearCompleted => {
                self.store.clear_completed()?;
            }
        }
        Ok(())
    }

    /// Enter the `Editing` state for one task. A no-op while any session is
    /// already active (guards against duplicate edit surfaces) or when the
    /// id is stale.
    fn start_edit(&mut self, id: &str) {
        if self.edit.is_some() {
            return;
        }
        if let Some(task) = self.store.tasks().iter().find(|t| t.id == id) {
            self.edit = Some(EditSession {
                id: task.id.clone(),
                original: task.text.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Placeholder;
    use std::fs;

    fn temp_controller(name: &str) -> Controller {
        let path = std::env::temp_dir().join(format!(
            "todo_controller_test_{}_{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        Controller::open(&path)
    }

    fn add(ctl: &mut Controller, text: &str) -> String {
        ctl.dispatch(Intent::SubmitNew(text.to_string())).unwrap();
        ctl.view().rows.last().unwrap().id.clone()
    }

    #[test]
    fn test_submit_and_toggle_flow() {
        let mut ctl = temp_controller("flow");
        let a = add(&mut ctl, "A");
        let _b = add(&mut ctl, "B");
        ctl.dispatch(Intent::ToggleTask(a)).unwrap();
        let vm = ctl.view();
        assert_eq!(vm.remaining, 1);
        assert!(vm.has_completed);
        assert_eq!(vm.rows.len(), 2);
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut ctl = temp_controller("blank");
        ctl.dispatch(Intent::SubmitNew("   ".to_string())).unwrap();
        let vm = ctl.view();
        assert!(vm.rows.is_empty());
        assert_eq!(vm.placeholder, Some(Placeholder::NoTasks));
    }

    #[test]
    fn test_filter_selection_is_view_only() {
        let mut ctl = temp_controller("filter");
        let a = add(&mut ctl, "A");
        add(&mut ctl, "B");
        ctl.dispatch(Intent::ToggleTask(a)).unwrap();
        ctl.dispatch(Intent::SelectFilter(Filter::Completed)).unwrap();
        let vm = ctl.view();
        assert_eq!(vm.rows.len(), 1);
        assert_eq!(vm.rows[0].text, "A");
        // Underlying collection is untouched.
        ctl.dispatch(Intent::SelectFilter(Filter::All)).unwrap();
        assert_eq!(ctl.view().rows.len(), 2);
    }

    #[test]
    fn test_edit_commit_replaces_text() {
        let mut ctl = temp_controller("commit");
        let a = add(&mut ctl, "original");
        ctl.dispatch(Intent::StartEdit(a.clone())).unwrap();
        assert_eq!(ctl.editing().unwrap().original, "original");
        ctl.dispatch(Intent::CommitEdit {
            id: a,
            text: "revised".to_string(),
        })
        .unwrap();
        assert!(ctl.editing().is_none());
        assert_eq!(ctl.view().rows[0].text, "revised");
    }

    #[test]
    fn test_edit_cancel_restores_original() {
        let mut ctl = temp_controller("cancel");
        let a = add(&mut ctl, "original");
        ctl.dispatch(Intent::StartEdit(a.clone())).unwrap();
        // Whatever was typed in between lives in the widget; cancel never
        // reaches the store.
        ctl.dispatch(Intent::CancelEdit(a)).unwrap();
        assert!(ctl.editing().is_none());
        assert_eq!(ctl.view().rows[0].text, "original");
    }

    #[test]
    fn test_double_commit_fires_once() {
        let mut ctl = temp_controller("double");
        let a = add(&mut ctl, "original");
        ctl.dispatch(Intent::StartEdit(a.clone())).unwrap();
        ctl.dispatch(Intent::CommitEdit {
            id: a.clone(),
            text: "first".to_string(),
        })
        .unwrap();
        // Focus-loss commit arriving after the confirm-key commit.
        ctl.dispatch(Intent::CommitEdit {
            id: a,
            text: "second".to_string(),
        })
        .unwrap();
        assert_eq!(ctl.view().rows[0].text, "first");
    }

    #[test]
    fn test_start_edit_while_editing_is_noop() {
        let mut ctl = temp_controller("reenter");
        let a = add(&mut ctl, "A");
        let b = add(&mut ctl, "B");
        ctl.dispatch(Intent::StartEdit(a.clone())).unwrap();
        ctl.dispatch(Intent::StartEdit(b)).unwrap();
        ctl.dispatch(Intent::StartEdit(a.clone())).unwrap();
        assert_eq!(ctl.editing().unwrap().id, a);
    }

    #[test]
    fn test_delete_drops_orphaned_edit_session() {
        let mut ctl = temp_controller("orphan");
        let a = add(&mut ctl, "A");
        ctl.dispatch(Intent::StartEdit(a.clone())).unwrap();
        ctl.dispatch(Intent::DeleteTask(a.clone())).unwrap();
        assert!(ctl.editing().is_none());
        // The late commit from the dead session is a benign no-op.
        ctl.dispatch(Intent::CommitEdit {
            id: a,
            text: "ghost".to_string(),
        })
        .unwrap();
        assert!(ctl.view().rows.is_empty());
    }

    #[test]
    fn test_clear_completed_keeps_active() {
        let mut ctl = temp_controller("clear");
        let a = add(&mut ctl, "A");
        add(&mut ctl, "B");
        ctl.dispatch(Intent::ToggleTask(a)).unwrap();
        ctl.dispatch(Intent::ClearCompleted).unwrap();
        let vm = ctl.view();
        assert_eq!(vm.rows.len(), 1);
        assert_eq!(vm.rows[0].text, "B");
        assert!(!vm.has_completed);
    }
}
