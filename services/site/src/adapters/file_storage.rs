//! services/site/src/adapters/file_storage.rs
//!
//! This module contains the file-backed adapter for the `LocalStorage` port
//! from the `core` crate. Each key is stored as one file inside a directory.

use portfolio_core::ports::{LocalStorage, PortError, PortResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A storage adapter that implements the `LocalStorage` port on the filesystem.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a new `FileStorage`, creating `dir` if it does not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys are mapped to file names; characters outside `[A-Za-z0-9._-]`
    /// become `_`.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

//=========================================================================================
// `LocalStorage` Trait Implementation
//=========================================================================================

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> PortResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so a
    /// crash never leaves a half-written value behind.
    fn set_item(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| PortError::Unexpected(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| PortError::Unexpected(e.to_string()))?;
        debug!(path = %path.display(), bytes = value.len(), "Stored item");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> PortResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_core::{NewTask, TaskStore};
    use std::sync::Arc;

    #[test]
    fn round_trips_values_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nested")).unwrap();

        assert_eq!(storage.get_item("portfolio-tasks").unwrap(), None);
        storage.set_item("portfolio-tasks", "[]").unwrap();
        assert_eq!(storage.get_item("portfolio-tasks").unwrap().as_deref(), Some("[]"));
        assert!(storage.dir().join("portfolio-tasks.json").exists());

        storage.remove_item("portfolio-tasks").unwrap();
        storage.remove_item("portfolio-tasks").unwrap();
        assert_eq!(storage.get_item("portfolio-tasks").unwrap(), None);
    }

    #[test]
    fn sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.set_item("../escape/me", "x").unwrap();
        assert!(dir.path().join(".._escape_me.json").exists());
    }

    #[test]
    fn task_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileStorage::open(dir.path()).unwrap());

        let id = {
            let mut store = TaskStore::load(storage.clone(), "tasks");
            store.add(NewTask::new("Persist me")).unwrap()
        };

        let reopened = TaskStore::load(Arc::new(FileStorage::open(dir.path()).unwrap()), "tasks");
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get(&id).unwrap().title, "Persist me");
    }
}
