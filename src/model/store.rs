use serde::Serialize;

use super::task::TaskState;

/// Which of the two record stores a task lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Active,
    Completed,
}

impl StoreKind {
    /// Search order used by every lookup: active first, then completed
    pub const SEARCH_ORDER: [StoreKind; 2] = [StoreKind::Active, StoreKind::Completed];

    /// File name of the store inside the data directory
    pub fn file_name(self) -> &'static str {
        match self {
            StoreKind::Active => "active.csv",
            StoreKind::Completed => "completed.csv",
        }
    }

    /// Section heading used when listing the store
    pub fn heading(self) -> &'static str {
        match self {
            StoreKind::Active => "ACTIVE",
            StoreKind::Completed => "COMPLETED",
        }
    }

    /// The state every record in this store is expected to carry
    pub fn expected_state(self) -> TaskState {
        match self {
            StoreKind::Active => TaskState::Open,
            StoreKind::Completed => TaskState::Completed,
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Active => write!(f, "active"),
            StoreKind::Completed => write!(f, "completed"),
        }
    }
}
