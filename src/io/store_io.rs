use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::store::StoreKind;
use crate::model::task::Task;
use crate::parse::{ParseError, parse_records, serialize_records};

/// Error type for store and config I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not create data directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse { path: PathBuf, source: ParseError },
    #[error("could not parse config.toml: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Resolved locations of everything kept in the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub data_dir: PathBuf,
    pub active: PathBuf,
    pub completed: PathBuf,
    pub config: PathBuf,
}

impl StorePaths {
    /// Standard layout inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        StorePaths {
            data_dir: data_dir.to_path_buf(),
            active: data_dir.join(StoreKind::Active.file_name()),
            completed: data_dir.join(StoreKind::Completed.file_name()),
            config: data_dir.join("config.toml"),
        }
    }

    pub fn store_file(&self, kind: StoreKind) -> &Path {
        match kind {
            StoreKind::Active => &self.active,
            StoreKind::Completed => &self.completed,
        }
    }
}

/// The pair of flat-file stores holding every task.
///
/// Every `save` rewrites the whole file. There is no locking; two processes
/// writing at once lose one of the updates.
#[derive(Debug, Clone)]
pub struct RecordStore {
    paths: StorePaths,
}

impl RecordStore {
    pub fn new(paths: StorePaths) -> Self {
        RecordStore { paths }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Create the data directory and a header-only file for each missing store.
    /// Safe to call repeatedly.
    pub fn ensure_initialized(&self) -> Result<(), StoreError> {
        let dir = &self.paths.data_dir;
        fs::create_dir_all(dir).map_err(|e| StoreError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;
        for kind in StoreKind::SEARCH_ORDER {
            if !self.paths.store_file(kind).exists() {
                tracing::debug!(store = %kind, "initializing empty store");
                self.save(kind, &[])?;
            }
        }
        Ok(())
    }

    /// Read all records of a store. A missing file is an empty store.
    pub fn try_load(&self, kind: StoreKind) -> Result<Vec<Task>, StoreError> {
        let path = self.paths.store_file(kind);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let tasks = parse_records(&text).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(store = %kind, count = tasks.len(), "loaded store");
        Ok(tasks)
    }

    /// Like `try_load`, but a read or parse failure is reported as a warning
    /// and treated as an empty store. Only for read-only commands: saving the
    /// result would wipe the unreadable file.
    pub fn load(&self, kind: StoreKind) -> Vec<Task> {
        match self.try_load(kind) {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!("{}; showing the {} store as empty", e, kind);
                Vec::new()
            }
        }
    }

    /// Replace the contents of a store with `tasks`.
    pub fn save(&self, kind: StoreKind, tasks: &[Task]) -> Result<(), StoreError> {
        let path = self.paths.store_file(kind);
        let content = serialize_records(tasks);
        atomic_write(path, content.as_bytes()).map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(store = %kind, count = tasks.len(), "saved store");
        Ok(())
    }
}

/// Write via a temp file in the same directory, then rename over the target.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
