use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::io::store_io::{RecordStore, StoreError};
use crate::model::store::StoreKind;
use crate::model::task::{Task, TaskState};

/// Structured result from `tt check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A broken invariant that lookups cannot work around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same ID appears more than once in one store
    #[serde(rename = "duplicate_id")]
    DuplicateId {
        store: StoreKind,
        task_id: String,
        count: usize,
    },
    /// The ID is held by both stores, e.g. after an interrupted `complete`
    #[serde(rename = "in_both_stores")]
    InBothStores { task_id: String },
}

/// A record that is readable but inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// The stored state code disagrees with the store holding the record
    #[serde(rename = "state_mismatch")]
    StateMismatch {
        store: StoreKind,
        task_id: String,
        state: TaskState,
    },
    #[serde(rename = "empty_title")]
    EmptyTitle { store: StoreKind, task_id: String },
}

/// Load both stores and validate them. Read-only.
///
/// Unlike listing, a store that cannot be read is an error here.
pub fn check_stores(store: &RecordStore) -> Result<CheckResult, StoreError> {
    let active = store.try_load(StoreKind::Active)?;
    let completed = store.try_load(StoreKind::Completed)?;
    Ok(check_records(&active, &completed))
}

/// Validate already-loaded store contents.
pub fn check_records(active: &[Task], completed: &[Task]) -> CheckResult {
    let mut result = CheckResult::default();

    for (kind, tasks) in [
        (StoreKind::Active, active),
        (StoreKind::Completed, completed),
    ] {
        for (task_id, count) in duplicate_ids(tasks) {
            result.errors.push(CheckError::DuplicateId {
                store: kind,
                task_id,
                count,
            });
        }
        for task in tasks {
            check_task(task, kind, &mut result);
        }
    }

    let completed_ids: HashSet<&str> = completed.iter().map(|t| t.id.as_str()).collect();
    let mut reported = HashSet::new();
    for task in active {
        if completed_ids.contains(task.id.as_str()) && reported.insert(task.id.as_str()) {
            result.errors.push(CheckError::InBothStores {
                task_id: task.id.clone(),
            });
        }
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_task(task: &Task, kind: StoreKind, result: &mut CheckResult) {
    if task.state != kind.expected_state() {
        result.warnings.push(CheckWarning::StateMismatch {
            store: kind,
            task_id: task.id.clone(),
            state: task.state,
        });
    }
    if task.title.trim().is_empty() {
        result.warnings.push(CheckWarning::EmptyTitle {
            store: kind,
            task_id: task.id.clone(),
        });
    }
}

/// IDs occurring more than once, in order of first appearance
fn duplicate_ids(tasks: &[Task]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for task in tasks {
        *counts.entry(task.id.as_str()).or_default() += 1;
    }

    let mut seen = HashSet::new();
    tasks
        .iter()
        .filter(|t| counts[t.id.as_str()] > 1 && seen.insert(t.id.as_str()))
        .map(|t| (t.id.clone(), counts[t.id.as_str()]))
        .collect()
}
