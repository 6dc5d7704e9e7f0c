use chrono::{Local, NaiveDateTime};
use uuid::Uuid;

use crate::io::store_io::{RecordStore, StoreError};
use crate::model::store::StoreKind;
use crate::model::task::{Task, TaskState};

/// Length of a generated task ID
pub const ID_LEN: usize = 8;

/// Timestamp format prefixed to annotations
const NOTE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("{0}")]
    Validation(String),
    #[error("no task found with ID: {0}")]
    NotFound(String),
    #[error("no active task found with ID: {0}")]
    NotFoundInActive(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Which stores `list_tasks` reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListScope {
    #[default]
    Active,
    Completed,
    All,
}

impl ListScope {
    pub fn stores(self) -> &'static [StoreKind] {
        match self {
            ListScope::Active => &[StoreKind::Active],
            ListScope::Completed => &[StoreKind::Completed],
            ListScope::All => &StoreKind::SEARCH_ORDER,
        }
    }
}

/// Fields to change in `update_task`. `None` leaves a field as it is.
///
/// `note` replaces the whole note. Use `annotate_task` to append a
/// timestamped entry instead.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// A task found by `locate`, together with the full contents of the store
/// holding it so the store can be rewritten after a change.
struct Located {
    kind: StoreKind,
    tasks: Vec<Task>,
    index: usize,
}

impl Located {
    fn task_mut(&mut self) -> &mut Task {
        &mut self.tasks[self.index]
    }

    fn save(&self, store: &RecordStore) -> Result<(), StoreError> {
        store.save(self.kind, &self.tasks)
    }
}

/// Search the active store, then the completed store, for an exact ID match.
/// Only loads the completed store if the active one has no match.
fn locate<F>(store: &RecordStore, id: &str, mut load: F) -> Result<Option<Located>, StoreError>
where
    F: FnMut(&RecordStore, StoreKind) -> Result<Vec<Task>, StoreError>,
{
    for kind in StoreKind::SEARCH_ORDER {
        let tasks = load(store, kind)?;
        if let Some(index) = find_index(&tasks, id) {
            return Ok(Some(Located { kind, tasks, index }));
        }
    }
    Ok(None)
}

/// Strict lookup for operations that rewrite the store afterwards
fn locate_for_update(store: &RecordStore, id: &str) -> Result<Located, TaskError> {
    locate(store, id, RecordStore::try_load)?.ok_or_else(|| TaskError::NotFound(id.to_string()))
}

/// Position of the first task with exactly this ID
pub fn find_index(tasks: &[Task], id: &str) -> Option<usize> {
    tasks.iter().position(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Create an open task in the active store. Returns the new ID.
pub fn create_task(store: &RecordStore, title: &str, note: &str) -> Result<String, TaskError> {
    require_text(title, "title is required")?;

    let mut tasks = store.try_load(StoreKind::Active)?;
    let id = generate_id();
    tasks.push(Task::new(id.clone(), title.to_string(), note.to_string()));
    store.save(StoreKind::Active, &tasks)?;

    tracing::info!(id = %id, "created task");
    Ok(id)
}

/// Remove a task from whichever store holds it. Returns the removed task.
pub fn remove_task(store: &RecordStore, id: &str) -> Result<Task, TaskError> {
    let mut found = locate_for_update(store, id)?;
    let removed = found.tasks.remove(found.index);
    found.save(store)?;

    tracing::info!(id = %id, store = %found.kind, "removed task");
    Ok(removed)
}

/// Apply the supplied fields to a task in either store.
pub fn update_task(store: &RecordStore, id: &str, update: TaskUpdate) -> Result<(), TaskError> {
    if let Some(title) = &update.title {
        require_text(title, "title cannot be empty")?;
    }

    let mut found = locate_for_update(store, id)?;
    let task = found.task_mut();
    if let Some(title) = update.title {
        task.title = title;
    }
    if let Some(note) = update.note {
        task.note = note;
    }
    found.save(store)?;

    tracing::info!(id = %id, store = %found.kind, "updated task");
    Ok(())
}

/// Append a timestamped entry to a task's note, using the local time.
pub fn annotate_task(store: &RecordStore, id: &str, text: &str) -> Result<(), TaskError> {
    annotate_task_at(store, id, text, Local::now().naive_local())
}

/// Append a `[YYYY-MM-DD HH:MM] text` entry stamped with `at`.
pub fn annotate_task_at(
    store: &RecordStore,
    id: &str,
    text: &str,
    at: NaiveDateTime,
) -> Result<(), TaskError> {
    require_text(text, "note content is required")?;

    let entry = format_note_entry(text, at);
    let mut found = locate_for_update(store, id)?;
    append_note(found.task_mut(), &entry);
    found.save(store)?;

    tracing::info!(id = %id, store = %found.kind, "annotated task");
    Ok(())
}

/// Move an open task to the completed store. Returns the completed task.
///
/// Only the active store is searched. The completed store is written before
/// the active one, so an interrupted run leaves the task in both stores
/// rather than in neither. Completing such a leftover again replaces the
/// stale completed copy instead of adding a second one.
pub fn complete_task(store: &RecordStore, id: &str) -> Result<Task, TaskError> {
    let mut active = store.try_load(StoreKind::Active)?;
    let index =
        find_index(&active, id).ok_or_else(|| TaskError::NotFoundInActive(id.to_string()))?;
    let mut task = active.remove(index);
    task.state = TaskState::Completed;

    let mut completed = store.try_load(StoreKind::Completed)?;
    match find_index(&completed, id) {
        Some(existing) => {
            tracing::warn!(id = %id, "task was already in the completed store; replacing it");
            completed[existing] = task.clone();
        }
        None => completed.push(task.clone()),
    }

    store.save(StoreKind::Completed, &completed)?;
    store.save(StoreKind::Active, &active)?;

    tracing::info!(id = %id, "completed task");
    Ok(task)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// All tasks of the selected stores, one section per store.
/// Unreadable stores show up empty (see `RecordStore::load`).
pub fn list_tasks(store: &RecordStore, scope: ListScope) -> Vec<(StoreKind, Vec<Task>)> {
    scope
        .stores()
        .iter()
        .map(|&kind| (kind, store.load(kind)))
        .collect()
}

/// Find a task in either store, with the store that holds it.
pub fn view_task(store: &RecordStore, id: &str) -> Result<(StoreKind, Task), TaskError> {
    let mut found = locate(store, id, |s, kind| Ok(s.load(kind)))?
        .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
    let task = found.tasks.swap_remove(found.index);
    Ok((found.kind, task))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A fresh ID: the first hex digits of a random v4 UUID. Not checked against
/// existing IDs.
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}

pub fn format_note_entry(text: &str, at: NaiveDateTime) -> String {
    format!("[{}] {}", at.format(NOTE_TIMESTAMP_FORMAT), text)
}

/// Append `entry` on its own line. Surrounding whitespace of the existing
/// note is dropped; a blank note is replaced.
pub fn append_note(task: &mut Task, entry: &str) {
    let current = task.note.trim();
    task.note = if current.is_empty() {
        entry.to_string()
    } else {
        format!("{}\n{}", current, entry)
    };
}

fn require_text(text: &str, message: &str) -> Result<(), TaskError> {
    if text.trim().is_empty() {
        return Err(TaskError::Validation(message.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
