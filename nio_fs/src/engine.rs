//! The storage engine of one origin.

use nio_core::{
    CapacityAllocator, EngineConfig, InvalidState, NameValidator, StorageError, StorageResult,
    Unbounded,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{handle::FileHandle, table::FileTable};

/// Owns the namespace of one origin and enforces every precondition before
/// mutating it.
///
/// All structural changes (create-on-open, rename, delete) and listings run
/// under one namespace lock, so they observe and produce only fully
/// committed states. File I/O goes through [`FileHandle`]s and only locks
/// the record it touches.
///
/// `Engine` is cheap to clone; clones share the same namespace.
#[derive(Clone, Debug)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

#[derive(Debug)]
struct EngineInner {
    origin: String,
    table: Mutex<FileTable>,
    validator: NameValidator,
    config: EngineConfig,
    capacity: Arc<dyn CapacityAllocator>,
}

impl Engine {
    pub fn new(origin: impl Into<String>, config: EngineConfig) -> Self {
        Self::with_capacity(origin, config, Arc::new(Unbounded))
    }

    /// Creates an engine that asks `capacity` before growing any file.
    pub fn with_capacity(
        origin: impl Into<String>,
        config: EngineConfig,
        capacity: Arc<dyn CapacityAllocator>,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                origin: origin.into(),
                table: Mutex::new(FileTable::new()),
                validator: config.name_validator(),
                config,
                capacity,
            }),
        }
    }

    pub fn origin(&self) -> &str {
        &self.inner.origin
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    fn table(&self) -> MutexGuard<'_, FileTable> {
        // FileTable methods check before they mutate, so a panic while the
        // lock is held cannot leave a half-applied change behind.
        self.inner.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens `name`, creating an empty file if it does not exist yet.
    ///
    /// Creation and handle attachment happen in one critical section, so
    /// concurrent opens of the same name always share one record and a
    /// concurrent rename or delete cannot slip in between.
    pub fn open(&self, name: &str) -> StorageResult<FileHandle> {
        self.inner.validator.validate(name)?;
        let record = {
            let mut table = self.table();
            let record = table.get_or_create(name);
            record.attach();
            record
        };
        tracing::debug!(
            "{}: opened {} ({} handles)",
            self.origin(),
            name,
            record.open_handles()
        );
        Ok(FileHandle::new(self.clone(), name.to_owned(), record))
    }

    /// Renames a closed file. Never overwrites an existing one.
    pub fn rename(&self, old_name: &str, new_name: &str) -> StorageResult<()> {
        self.inner.validator.validate(new_name)?;
        self.table()
            .rename_if_closed(old_name, new_name)
            .inspect_err(|err| {
                tracing::warn!(
                    "{}: rename {} -> {} refused: {}",
                    self.origin(),
                    old_name,
                    new_name,
                    err
                )
            })
    }

    /// Deletes a closed file and releases its contents. Deleting a name
    /// that does not exist succeeds without doing anything.
    pub fn delete(&self, name: &str) -> StorageResult<()> {
        self.inner.validator.validate(name)?;
        let removed = self.table().remove_if_closed(name).inspect_err(|err| {
            tracing::warn!("{}: delete {} refused: {}", self.origin(), name, err)
        })?;
        match removed {
            Some(record) => {
                tracing::debug!("{}: deleted {} ({} bytes)", self.origin(), name, record.len())
            }
            None => tracing::debug!("{}: delete {}: no such file", self.origin(), name),
        }
        Ok(())
    }

    /// Names of all files, open or closed, in sorted order.
    pub fn get_all(&self) -> Vec<String> {
        self.table().names()
    }

    /// Asks the capacity allocator whether `name` may grow from `current`
    /// to `requested` bytes.
    pub(crate) fn grant_growth(
        &self,
        name: &str,
        current: u64,
        requested: u64,
    ) -> StorageResult<()> {
        if self.inner.capacity.grant(name, current, requested) {
            Ok(())
        } else {
            Err(self.refuse_growth(name, current, requested))
        }
    }

    pub(crate) fn refuse_growth(&self, name: &str, current: u64, requested: u64) -> StorageError {
        tracing::warn!(
            "{}: growth of {} from {} to {} bytes refused",
            self.origin(),
            name,
            current,
            requested
        );
        StorageError::QuotaExceeded {
            name: name.to_owned(),
            current,
            requested,
        }
    }

    /// Converts a file end position to an in-memory index, if it lies
    /// within the addressable ceiling.
    pub(crate) fn addressable(&self, end: u64) -> Option<usize> {
        if end > self.inner.config.max_file_length {
            return None;
        }
        usize::try_from(end).ok()
    }

    /// Checks that a read of `len` bytes at `offset` ends within the
    /// addressable ceiling.
    pub(crate) fn check_read_range(&self, offset: u64, len: u64) -> StorageResult<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.inner.config.max_file_length => Ok(()),
            _ => Err(InvalidState::OutOfRange { offset, len }.into()),
        }
    }
}
