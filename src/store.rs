//! File-backed task store.
//!
//! This module provides the `TaskStore` struct that owns the ordered task
//! collection and persists it to a JSON file. Every successful mutation
//! writes the full collection back to disk before returning, so the file and
//! the in-memory state are never observably divergent.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::task::Task;

/// Ordered task collection bound to a JSON file on disk.
///
/// The collection is private: all mutation goes through the operations below,
/// each of which persists synchronously on success. Insertion order is
/// preserved and never re-sorted by completion state.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    path: PathBuf,
    seq: u64,
}

impl TaskStore {
    /// Open a store backed by the given file, loading any existing tasks.
    ///
    /// Missing, unreadable, or unparsable files all yield an empty
    /// collection rather than an error; prior-state corruption is never
    /// surfaced to the user.
    pub fn open(path: &Path) -> Self {
        TaskStore {
            tasks: load_tasks(path),
            path: path.to_path_buf(),
            seq: 0,
        }
    }

    /// Read-only view of the full collection, insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a task with the given text, returning it after persisting.
    ///
    /// Blank (empty or whitespace-only) text is rejected as a no-op and
    /// returns `None` without touching the file.
    pub fn add(&mut self, text: &str) -> io::Result<Option<&Task>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let id = self.next_id();
        self.tasks.push(Task::new(id, text.to_string()));
        self.save()?;
        Ok(self.tasks.last())
    }

    /// Flip the completion flag on the task with the given id.
    ///
    /// Returns whether a task was found; an absent id is a benign no-op
    /// (stale UI reference), not an error.
    pub fn toggle(&mut self, id: &str) -> io::Result<bool> {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the task with the given id, if present.
    pub fn remove(&mut self, id: &str) -> io::Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Replace the text of the task with the given id.
    ///
    /// Blank replacement text is treated as a cancelled edit (no-op, the
    /// existing text stands). Text equal to the current value is also a
    /// no-op so unchanged edits never trigger a redundant write.
    pub fn edit(&mut self, id: &str, new_text: &str) -> io::Result<bool> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Ok(false);
        }
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) if task.text != new_text => {
                task.text = new_text.to_string();
                self.save()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Remove every completed task, returning how many were dropped.
    ///
    /// Persists even when nothing changed; the operation is idempotent so
    /// the extra write is harmless.
    pub fn clear_completed(&mut self) -> io::Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        self.save()?;
        Ok(removed)
    }

    /// Generate a fresh task id: current UTC milliseconds in base 36 plus a
    /// base-36 sequence suffix. The sequence keeps ids unique within one
    /// millisecond, and the existing collection is re-checked so reloaded
    /// blobs can never collide either.
    fn next_id(&mut self) -> String {
        loop {
            self.seq += 1;
            let id = format!(
                "{}-{}",
                to_base36(Utc::now().timestamp_millis() as u64),
                to_base36(self.seq)
            );
            if !self.tasks.iter().any(|t| t.id == id) {
                return id;
            }
        }
    }

    /// Write the full collection to disk using atomic write (temp file + rename).
    fn save(&self) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(&self.tasks).unwrap();
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

/// Load the task array from a JSON file, falling back to an empty
/// collection on any failure.
fn load_tasks(path: &Path) -> Vec<Task> {
    if !path.exists() {
        return Vec::new();
    }
    let mut buf = String::new();
    match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
        Ok(_) => match serde_json::from_str(&buf) {
            Ok(tasks) => tasks,
            Err(e) => {
                eprintln!("Error parsing task file, starting fresh: {e}");
                Vec::new()
            }
        },
        Err(e) => {
            eprintln!("Error reading task file, starting fresh: {e}");
            Vec::new()
        }
    }
}

/// Render a number in base 36 (0-9, a-z), lowest value "0".
fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> TaskStore {
        let path = std::env::temp_dir().join(format!(
            "todo_store_test_{}_{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        TaskStore::open(&path)
    }

    fn on_disk(store: &TaskStore) -> Vec<Task> {
        let data = fs::read_to_string(store.path()).unwrap();
        serde_json::from_str(&data).unwrap()
    }

    fn assert_coherent(store: &TaskStore) {
        let disk = on_disk(store);
        assert_eq!(disk.len(), store.tasks().len());
        for (a, b) in disk.iter().zip(store.tasks()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.text, b.text);
            assert_eq!(a.completed, b.completed);
        }
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let mut store = temp_store("blank");
        assert!(store.add("").unwrap().is_none());
        assert!(store.add("   ").unwrap().is_none());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_add_trims_and_persists() {
        let mut store = temp_store("add");
        let id = store.add("  buy milk  ").unwrap().unwrap().id.clone();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].text, "buy milk");
        assert!(!store.tasks()[0].completed);
        assert_eq!(store.tasks()[0].id, id);
        assert_coherent(&store);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = temp_store("ids");
        for i in 0..50 {
            store.add(&format!("task {i}")).unwrap();
        }
        let mut ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_toggle_is_involution() {
        let mut store = temp_store("toggle");
        let id = store.add("task").unwrap().unwrap().id.clone();
        assert!(store.toggle(&id).unwrap());
        assert!(store.tasks()[0].completed);
        assert_coherent(&store);
        assert!(store.toggle(&id).unwrap());
        assert!(!store.tasks()[0].completed);
        assert_coherent(&store);
    }

    #[test]
    fn test_absent_id_is_noop() {
        let mut store = temp_store("absent");
        store.add("task").unwrap();
        assert!(!store.toggle("nope").unwrap());
        assert!(!store.remove("nope").unwrap());
        assert!(!store.edit("nope", "other").unwrap());
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].text, "task");
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut store = temp_store("remove");
        let a = store.add("a").unwrap().unwrap().id.clone();
        let b = store.add("b").unwrap().unwrap().id.clone();
        store.add("c").unwrap();
        assert!(store.remove(&b).unwrap());
        let texts: Vec<&str> = store.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["a", "c"]);
        assert_eq!(store.tasks()[0].id, a);
        assert_coherent(&store);
    }

    #[test]
    fn test_edit_blank_and_same_text_skip_persist() {
        let mut store = temp_store("edit_noop");
        let id = store.add("original").unwrap().unwrap().id.clone();
        // Corrupt the blob out-of-band so a redundant save would be visible.
        fs::write(store.path(), "[]").unwrap();
        assert!(!store.edit(&id, "").unwrap());
        assert!(!store.edit(&id, "   ").unwrap());
        assert!(!store.edit(&id, "original").unwrap());
        assert_eq!(store.tasks()[0].text, "original");
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[test]
    fn test_edit_replaces_text() {
        let mut store = temp_store("edit");
        let id = store.add("original").unwrap().unwrap().id.clone();
        assert!(store.edit(&id, "  revised  ").unwrap());
        assert_eq!(store.tasks()[0].text, "revised");
        assert_coherent(&store);
    }

    #[test]
    fn test_clear_completed_is_idempotent() {
        let mut store = temp_store("clear");
        let a = store.add("a").unwrap().unwrap().id.clone();
        store.add("b").unwrap();
        let c = store.add("c").unwrap().unwrap().id.clone();
        store.toggle(&a).unwrap();
        store.toggle(&c).unwrap();
        assert_eq!(store.clear_completed().unwrap(), 2);
        let texts: Vec<&str> = store.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["b"]);
        assert_eq!(store.clear_completed().unwrap(), 0);
        assert_eq!(store.tasks().len(), 1);
        assert_coherent(&store);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let store = temp_store("missing");
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let path = std::env::temp_dir().join(format!(
            "todo_store_test_malformed_{}.json",
            std::process::id()
        ));
        fs::write(&path, "{not json").unwrap();
        let store = TaskStore::open(&path);
        assert!(store.tasks().is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_reload_round_trip() {
        let mut store = temp_store("reload");
        store.add("a").unwrap();
        let b = store.add("b").unwrap().unwrap().id.clone();
        store.toggle(&b).unwrap();
        let path = store.path().to_path_buf();
        let reloaded = TaskStore::open(&path);
        assert_eq!(reloaded.tasks().len(), 2);
        assert_eq!(reloaded.tasks()[1].id, b);
        assert!(reloaded.tasks()[1].completed);
    }
}
