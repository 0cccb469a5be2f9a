//! Open sessions on a file.

use nio_core::{InvalidState, StorageError, StorageResult};
use std::sync::Arc;

use crate::{
    engine::Engine,
    record::{FileRecord, GrowError},
};

#[derive(Debug)]
enum HandleState {
    Open(Arc<FileRecord>),
    Closed,
}

/// A session on one file, created by [`Engine::open`].
///
/// While open, the handle keeps the file's open-handle count raised, which
/// blocks rename and delete of that file. Closing is idempotent, and
/// dropping an open handle closes it.
///
/// All I/O methods take `&mut self`: a handle serves one operation at a time.
#[derive(Debug)]
pub struct FileHandle {
    engine: Engine,
    name: String,
    state: HandleState,
}

impl FileHandle {
    pub(crate) fn new(engine: Engine, name: String, record: Arc<FileRecord>) -> Self {
        Self {
            engine,
            name,
            state: HandleState::Open(record),
        }
    }

    /// The name the file had when this handle was opened. Open files cannot
    /// be renamed, so it stays accurate for the life of the handle.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, HandleState::Open(_))
    }

    fn record(&self) -> StorageResult<&Arc<FileRecord>> {
        match &self.state {
            HandleState::Open(record) => Ok(record),
            HandleState::Closed => Err(InvalidState::HandleClosed.into()),
        }
    }

    /// Fills `buf` with the bytes at `offset`. Positions past the end of
    /// the file read as zero. Returns how many bytes came from the file.
    pub fn read(&mut self, buf: &mut [u8], offset: u64) -> StorageResult<usize> {
        let record = self.record()?;
        self.engine.check_read_range(offset, buf.len() as u64)?;
        // An offset beyond the address space is beyond any content too.
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(record.read_at(buf, offset))
    }

    /// Writes `bytes` at `offset`, growing the file if needed. Any gap
    /// between the old end and `offset` is zero-filled. Returns the number
    /// of bytes written.
    pub fn write(&mut self, bytes: &[u8], offset: u64) -> StorageResult<usize> {
        let record = self.record()?;
        if bytes.is_empty() {
            return Ok(0);
        }
        let requested = offset.saturating_add(bytes.len() as u64);
        let Some(end) = self.engine.addressable(requested) else {
            return Err(self.engine.refuse_growth(&self.name, record.len(), requested));
        };
        record
            .write_at(bytes, end - bytes.len(), |current, requested| {
                self.engine.grant_growth(&self.name, current, requested)
            })
            .map_err(|err| self.growth_refused(err))?;
        Ok(bytes.len())
    }

    /// Truncates the file from its end, or extends it with zeros, to
    /// exactly `len` bytes.
    pub fn set_length(&mut self, len: u64) -> StorageResult<()> {
        let record = self.record()?;
        let Some(new_len) = self.engine.addressable(len) else {
            return Err(self.engine.refuse_growth(&self.name, record.len(), len));
        };
        record
            .set_len(new_len, |current, requested| {
                self.engine.grant_growth(&self.name, current, requested)
            })
            .map_err(|err| self.growth_refused(err))?;
        tracing::debug!(
            "{}: set length of {} to {}",
            self.engine.origin(),
            self.name,
            len
        );
        Ok(())
    }

    fn growth_refused(&self, err: GrowError<StorageError>) -> StorageError {
        match err {
            GrowError::Vetoed(err) => err,
            GrowError::OutOfMemory { current, requested } => {
                self.engine.refuse_growth(&self.name, current, requested)
            }
        }
    }

    pub fn get_length(&self) -> StorageResult<u64> {
        Ok(self.record()?.len())
    }

    /// Detaches from the file. A second close is a no-op.
    pub fn close(&mut self) {
        if let HandleState::Open(record) =
            std::mem::replace(&mut self.state, HandleState::Closed)
        {
            record.detach();
            tracing::debug!("{}: closed {}", self.engine.origin(), self.name);
        }
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        self.close();
    }
}
