//! Task store: a persisted, insertion-ordered task collection.
//!
//! The store owns one storage slot holding the whole collection as JSON and
//! mutates it read-modify-write: every `add` or `delete` loads the full list,
//! changes it, and writes it back. The storage backend is injected behind the
//! `StorageSlot` trait so tests run against an in-memory fake.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::task::{self, Task};

/// A single named key-value slot holding the serialized task collection.
pub trait StorageSlot {
    /// Read the slot's payload, `None` when nothing has been persisted yet.
    fn read(&self) -> io::Result<Option<String>>;

    /// Overwrite the slot's payload entirely.
    fn write(&mut self, payload: &str) -> io::Result<()>;
}

/// File-backed storage slot.
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: &Path) -> Self {
        FileSlot { path: path.to_path_buf() }
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> io::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut buf = String::new();
        File::open(&self.path)?.read_to_string(&mut buf)?;
        Ok(Some(buf))
    }

    fn write(&mut self, payload: &str) -> io::Result<()> {
        // Atomic-ish write via temp + rename.
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(payload.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory storage slot for tests.
#[derive(Default)]
pub struct MemorySlot {
    payload: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        MemorySlot::default()
    }

    /// Pre-seed the slot, e.g. with a legacy or malformed payload.
    pub fn with_payload(payload: &str) -> Self {
        MemorySlot { payload: Some(payload.to_string()) }
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.payload.clone())
    }

    fn write(&mut self, payload: &str) -> io::Result<()> {
        self.payload = Some(payload.to_string());
        Ok(())
    }
}

/// Why an `add` was rejected or failed.
#[derive(Debug)]
pub enum AddError {
    /// The task text trimmed to nothing.
    EmptyText,
    /// The optional date-time input did not parse.
    BadTimestamp(String),
    /// The storage backend failed.
    Storage(io::Error),
}

impl std::fmt::Display for AddError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddError::EmptyText => write!(f, "Please enter a plan or event description."),
            AddError::BadTimestamp(s) => write!(f, "Unrecognised date-time: '{s}'"),
            AddError::Storage(e) => write!(f, "Storage error: {e}"),
        }
    }
}

impl std::error::Error for AddError {}

impl From<io::Error> for AddError {
    fn from(e: io::Error) -> Self {
        AddError::Storage(e)
    }
}

/// One display row of the rendered task list.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    /// Stable task id, the delete key for interactive surfaces.
    pub id: u64,
    /// Current position in the collection. Shifts on deletion.
    pub index: usize,
    pub text: String,
    /// Local-time rendering of the stored timestamp.
    pub when: String,
}

/// Pure projection of a task collection into display rows.
pub fn rows_for(tasks: &[Task]) -> Vec<TaskRow> {
    tasks
        .iter()
        .enumerate()
        .map(|(index, t)| TaskRow {
            id: t.id,
            index,
            text: t.text.clone(),
            when: task::format_timestamp_local(&t.timestamp),
        })
        .collect()
}

/// The task store. Owns its storage slot; nothing else touches it.
pub struct TaskStore<S: StorageSlot> {
    slot: S,
}

impl<S: StorageSlot> TaskStore<S> {
    pub fn new(slot: S) -> Self {
        TaskStore { slot }
    }

    /// Load the persisted collection, reporting recovery on stderr.
    ///
    /// An absent slot is an empty collection. A payload that fails to parse
    /// is treated as empty rather than aborting; the next persist overwrites
    /// it. Tasks persisted before ids existed load as id 0 and get fresh ids
    /// assigned here.
    pub fn load(&self) -> Vec<Task> {
        let (tasks, warning) = self.load_reported();
        if let Some(w) = warning {
            eprintln!("{w}");
        }
        tasks
    }

    /// Load the persisted collection, returning the recovery warning instead
    /// of printing it. The TUI shows it in the status bar; stderr would be
    /// lost behind the alternate screen.
    pub fn load_reported(&self) -> (Vec<Task>, Option<String>) {
        let payload = match self.slot.read() {
            Ok(Some(p)) => p,
            Ok(None) => return (Vec::new(), None),
            Err(e) => {
                return (
                    Vec::new(),
                    Some(format!("Error reading task slot, starting fresh: {e}")),
                );
            }
        };
        let mut tasks: Vec<Task> = match serde_json::from_str(&payload) {
            Ok(tasks) => tasks,
            Err(e) => {
                return (
                    Vec::new(),
                    Some(format!("Error parsing task slot, starting fresh: {e}")),
                );
            }
        };
        backfill_ids(&mut tasks);
        (tasks, None)
    }

    /// Serialize the full collection and overwrite the slot with it.
    pub fn persist(&mut self, tasks: &[Task]) -> io::Result<()> {
        let payload = serde_json::to_string_pretty(tasks).unwrap();
        self.slot.write(&payload)
    }

    /// Append a new task and persist.
    ///
    /// `text` is trimmed; blank text is rejected before any mutation. `when`
    /// present is normalised to UTC ISO-8601, absent means "now". An
    /// unreadable slot is recovered silently here; display paths report it.
    pub fn add(&mut self, text: &str, when: Option<&str>) -> Result<Task, AddError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AddError::EmptyText);
        }
        let timestamp = match when.map(str::trim).filter(|w| !w.is_empty()) {
            Some(w) => task::parse_when_input(w).ok_or_else(|| AddError::BadTimestamp(w.to_string()))?,
            None => task::now_iso(),
        };

        let mut tasks = self.load_reported().0;
        let task = Task {
            id: next_id(&tasks),
            text: text.to_string(),
            timestamp,
        };
        tasks.push(task.clone());
        self.persist(&tasks)?;
        Ok(task)
    }

    /// Remove the task at a positional index and persist.
    ///
    /// An out-of-range index is a silent no-op; the persisted collection is
    /// rewritten either way.
    pub fn delete(&mut self, index: usize) -> io::Result<()> {
        let mut tasks = self.load_reported().0;
        if index < tasks.len() {
            tasks.remove(index);
        }
        self.persist(&tasks)
    }

    /// Remove the task with a stable id and persist.
    ///
    /// Unlike positional deletion this cannot misfire when earlier rows have
    /// been removed since the caller last looked. Unknown ids are a no-op.
    pub fn delete_by_id(&mut self, id: u64) -> io::Result<()> {
        let mut tasks = self.load_reported().0;
        tasks.retain(|t| t.id != id);
        self.persist(&tasks)
    }

    /// Load and project the collection into display rows.
    pub fn rows(&self) -> Vec<TaskRow> {
        rows_for(&self.load())
    }
}

/// Generate the next available task id.
fn next_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

/// Assign fresh ids to tasks loaded from slots written before ids existed.
fn backfill_ids(tasks: &mut [Task]) {
    let mut next = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
    for t in tasks.iter_mut() {
        if t.id == 0 {
            t.id = next;
            next += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TaskStore<MemorySlot> {
        TaskStore::new(MemorySlot::new())
    }

    #[test]
    fn test_load_empty_slot_is_empty_collection() {
        assert!(store().load().is_empty());
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let mut s = store();
        for text in ["one", "two", "three"] {
            s.add(text, None).unwrap();
        }
        let tasks = s.load();
        assert_eq!(tasks.len(), 3);
        let texts: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "three"]);
    }

    #[test]
    fn test_add_trims_text() {
        let mut s = store();
        s.add("  Buy milk  ", None).unwrap();
        assert_eq!(s.load()[0].text, "Buy milk");
    }

    #[test]
    fn test_add_blank_text_rejected_without_mutation() {
        let mut s = store();
        s.add("keep me", None).unwrap();
        for blank in ["", "   ", "\t\n"] {
            match s.add(blank, None) {
                Err(AddError::EmptyText) => {}
                other => panic!("expected EmptyText, got {other:?}"),
            }
        }
        assert_eq!(s.load().len(), 1);
    }

    #[test]
    fn test_add_bad_timestamp_rejected_without_mutation() {
        let mut s = store();
        match s.add("task", Some("soonish")) {
            Err(AddError::BadTimestamp(w)) => assert_eq!(w, "soonish"),
            other => panic!("expected BadTimestamp, got {other:?}"),
        }
        assert!(s.load().is_empty());
    }

    #[test]
    fn test_add_with_explicit_when_normalises_to_utc() {
        let mut s = store();
        s.add("Call Bob", Some("2024-01-01T10:00")).unwrap();
        assert_eq!(s.load()[0].timestamp, "2024-01-01T10:00:00.000Z");
    }

    #[test]
    fn test_persist_then_load_round_trips() {
        let mut s = store();
        let tasks = vec![
            Task { id: 1, text: "a".into(), timestamp: "2024-01-01T10:00:00.000Z".into() },
            Task { id: 2, text: "b".into(), timestamp: "2024-06-15T08:30:00.000Z".into() },
        ];
        s.persist(&tasks).unwrap();
        assert_eq!(s.load(), tasks);
    }

    #[test]
    fn test_delete_removes_exactly_the_indexed_element() {
        let mut s = store();
        for text in ["a", "b", "c"] {
            s.add(text, None).unwrap();
        }
        s.delete(1).unwrap();
        let texts: Vec<String> = s.load().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, ["a", "c"]);
    }

    #[test]
    fn test_delete_out_of_range_is_a_noop() {
        let mut s = store();
        s.add("only", None).unwrap();
        s.delete(5).unwrap();
        assert_eq!(s.load().len(), 1);
    }

    #[test]
    fn test_delete_by_id_survives_index_shifts() {
        let mut s = store();
        for text in ["a", "b", "c"] {
            s.add(text, None).unwrap();
        }
        let target = s.load()[2].id;
        s.delete(0).unwrap();
        s.delete_by_id(target).unwrap();
        let texts: Vec<String> = s.load().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, ["b"]);
    }

    #[test]
    fn test_delete_by_id_unknown_is_a_noop() {
        let mut s = store();
        s.add("only", None).unwrap();
        s.delete_by_id(999).unwrap();
        assert_eq!(s.load().len(), 1);
    }

    #[test]
    fn test_malformed_payload_treated_as_empty() {
        let s = TaskStore::new(MemorySlot::with_payload("{not json"));
        assert!(s.load().is_empty());
    }

    #[test]
    fn test_load_reported_returns_warning_for_malformed_payload() {
        let s = TaskStore::new(MemorySlot::with_payload("{not json"));
        let (tasks, warning) = s.load_reported();
        assert!(tasks.is_empty());
        assert!(warning.unwrap().contains("starting fresh"));
    }

    #[test]
    fn test_load_reported_empty_slot_has_no_warning() {
        let (tasks, warning) = store().load_reported();
        assert!(tasks.is_empty());
        assert_eq!(warning, None);
    }

    #[test]
    fn test_add_over_malformed_payload_starts_fresh() {
        let mut s = TaskStore::new(MemorySlot::with_payload("{not json"));
        s.add("first after reset", None).unwrap();
        let (tasks, warning) = s.load_reported();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "first after reset");
        // The persist rewrote the slot, so the warning is gone.
        assert_eq!(warning, None);
    }

    #[test]
    fn test_legacy_payload_without_ids_is_backfilled() {
        let payload = r#"[
            {"text": "old one", "timestamp": "2023-03-01T09:00:00.000Z"},
            {"text": "old two", "timestamp": "2023-03-02T09:00:00.000Z"}
        ]"#;
        let s = TaskStore::new(MemorySlot::with_payload(payload));
        let tasks = s.load();
        assert!(tasks[0].id != 0 && tasks[1].id != 0);
        assert_ne!(tasks[0].id, tasks[1].id);
    }

    #[test]
    fn test_add_scenario_buy_milk_call_bob() {
        let mut s = store();
        s.add("Buy milk", None).unwrap();
        s.add("Call Bob", Some("2024-01-01T10:00")).unwrap();
        assert_eq!(s.load().len(), 2);
        assert_eq!(s.load()[1].timestamp, "2024-01-01T10:00:00.000Z");
        s.delete(0).unwrap();
        let tasks = s.load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Call Bob");
    }

    #[test]
    fn test_rows_projection_is_positional_and_id_tagged() {
        let tasks = vec![
            Task { id: 7, text: "a".into(), timestamp: "bad".into() },
            Task { id: 9, text: "b".into(), timestamp: "2024-01-01T10:00:00.000Z".into() },
        ];
        let rows = rows_for(&tasks);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].id, rows[0].index), (7, 0));
        assert_eq!((rows[1].id, rows[1].index), (9, 1));
        // Unparseable timestamps surface as-is.
        assert_eq!(rows[0].when, "bad");
    }

    #[test]
    fn test_file_slot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut slot = FileSlot::new(&path);
        assert_eq!(slot.read().unwrap(), None);
        slot.write("[1, 2]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[1, 2]"));
        slot.write("[]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_slot_backed_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut s = TaskStore::new(FileSlot::new(&path));
        s.add("persisted", Some("2024-01-01T10:00")).unwrap();

        // A second store over the same path sees the same collection.
        let again = TaskStore::new(FileSlot::new(&path));
        assert_eq!(again.load()[0].text, "persisted");
    }
}
