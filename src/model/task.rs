use serde::{Deserialize, Serialize};

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Open,
    Completed,
}

impl TaskState {
    /// The single-character code stored in the `state` column
    pub fn code(self) -> &'static str {
        match self {
            TaskState::Open => "O",
            TaskState::Completed => "X",
        }
    }

    /// Parse a stored state code
    pub fn from_code(code: &str) -> Option<TaskState> {
        match code {
            "O" => Some(TaskState::Open),
            "X" => Some(TaskState::Completed),
            _ => None,
        }
    }

    /// Human-readable label used in listings and the detail view
    pub fn label(self) -> &'static str {
        match self {
            TaskState::Open => "Open",
            TaskState::Completed => "Completed",
        }
    }
}

/// A single task record. Field order matches the column order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Short hex identifier, immutable after creation
    pub id: String,
    pub title: String,
    pub state: TaskState,
    /// Free-form, possibly multi-line. Empty when unset.
    pub note: String,
}

impl Task {
    /// Create a new open task
    pub fn new(id: String, title: String, note: String) -> Self {
        Task {
            id,
            title,
            state: TaskState::Open,
            note,
        }
    }

    pub fn has_note(&self) -> bool {
        !self.note.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes() {
        assert_eq!(TaskState::Open.code(), "O");
        assert_eq!(TaskState::Completed.code(), "X");
        assert_eq!(TaskState::from_code("O"), Some(TaskState::Open));
        assert_eq!(TaskState::from_code("X"), Some(TaskState::Completed));
        assert_eq!(TaskState::from_code("x"), None);
        assert_eq!(TaskState::from_code(""), None);
    }

    #[test]
    fn test_new_task_is_open() {
        let task = Task::new("abc123ef".into(), "Write report".into(), String::new());
        assert_eq!(task.state, TaskState::Open);
        assert!(!task.has_note());
    }

    #[test]
    fn test_state_serializes_lowercase() {
        let json = serde_json::to_string(&TaskState::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
