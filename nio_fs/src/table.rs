//! The namespace registry of one origin.
//!
//! `FileTable` itself is not synchronised: the [`Engine`](crate::Engine)
//! keeps it behind a single mutex and every method here runs as one
//! critical section. Each method checks all of its preconditions before
//! touching the map, so a failed call leaves the table untouched.

use nio_core::{InvalidState, StorageError, StorageResult};
use std::{collections::HashMap, sync::Arc};

use crate::record::FileRecord;

#[derive(Debug, Default)]
pub struct FileTable {
    files: HashMap<String, Arc<FileRecord>>,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<FileRecord>> {
        self.files.get(name).cloned()
    }

    /// Returns the record for `name`, inserting an empty one if absent.
    pub fn get_or_create(&mut self, name: &str) -> Arc<FileRecord> {
        self.files
            .entry(name.to_owned())
            .or_insert_with(|| {
                tracing::debug!("file_table: created {}", name);
                Arc::new(FileRecord::new())
            })
            .clone()
    }

    /// Removes `name` unless it has open handles. Returns `None` if there
    /// was nothing to remove.
    pub fn remove_if_closed(&mut self, name: &str) -> StorageResult<Option<Arc<FileRecord>>> {
        let Some(record) = self.files.get(name) else {
            return Ok(None);
        };
        if record.is_open() {
            return Err(InvalidState::FileOpen(name.to_owned()).into());
        }
        let record = self.files.remove(name);
        tracing::debug!("file_table: removed {}", name);
        Ok(record)
    }

    /// Re-keys the record at `old_name` to `new_name`.
    ///
    /// Fails with `NotFound` if `old_name` is absent, and with
    /// `InvalidState` if it has open handles or `new_name` is taken.
    /// Never overwrites an existing file.
    pub fn rename_if_closed(&mut self, old_name: &str, new_name: &str) -> StorageResult<()> {
        let record = self
            .files
            .get(old_name)
            .ok_or_else(|| StorageError::NotFound(old_name.to_owned()))?;
        if record.is_open() {
            return Err(InvalidState::FileOpen(old_name.to_owned()).into());
        }
        if self.files.contains_key(new_name) {
            return Err(InvalidState::DestinationExists(new_name.to_owned()).into());
        }
        let record = self
            .files
            .remove(old_name)
            .ok_or_else(|| StorageError::NotFound(old_name.to_owned()))?;
        self.files.insert(new_name.to_owned(), record);
        tracing::debug!("file_table: renamed {} -> {}", old_name, new_name);
        Ok(())
    }

    /// All names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
