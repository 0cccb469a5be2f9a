//! Per-file state: content buffer and open-handle count.

use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

/// Why a record refused to grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GrowError<E> {
    /// The `may_grow` callback said no.
    Vetoed(E),
    /// The buffer could not be reserved.
    OutOfMemory { current: u64, requested: u64 },
}

/// The registered representation of one file.
///
/// The record's name is its key in the [`FileTable`](crate::table::FileTable);
/// the record itself only owns the bytes and the number of attached handles.
/// The file length is the length of the content buffer, so length and
/// content always change together under one lock.
#[derive(Debug, Default)]
pub struct FileRecord {
    content: Mutex<Vec<u8>>,
    open_handles: AtomicUsize,
}

impl FileRecord {
    pub fn new() -> Self {
        Self::default()
    }

    fn content(&self) -> MutexGuard<'_, Vec<u8>> {
        // Every mutation below completes before the guard is released, so a
        // poisoned lock still holds a consistent buffer.
        self.content.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> u64 {
        self.content().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::Acquire)
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open_handles() > 0
    }

    /// Must be called with the namespace lock held, so that rename and
    /// delete never observe a zero count while a handle is being attached.
    pub(crate) fn attach(&self) {
        self.open_handles.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn detach(&self) {
        let prev = self.open_handles.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "detached a record with no open handles");
    }

    /// Copies bytes starting at `offset` into `buf`. Positions at or past
    /// the end of the file are zeroed. Returns how many bytes came from the
    /// file itself.
    pub(crate) fn read_at(&self, buf: &mut [u8], offset: usize) -> usize {
        let content = self.content();
        let available = content.len().saturating_sub(offset).min(buf.len());
        if available > 0 {
            buf[..available].copy_from_slice(&content[offset..offset + available]);
        }
        buf[available..].fill(0);
        available
    }

    /// Writes `bytes` at `offset`. Growth zero-fills any gap between the
    /// old end and `offset` before copying; `may_grow` is asked first with
    /// the current and requested length and can veto the whole write. An
    /// empty write never grows the file.
    pub(crate) fn write_at<E>(
        &self,
        bytes: &[u8],
        offset: usize,
        may_grow: impl FnOnce(u64, u64) -> Result<(), E>,
    ) -> Result<(), GrowError<E>> {
        if bytes.is_empty() {
            return Ok(());
        }
        let end = offset
            .checked_add(bytes.len())
            .ok_or(GrowError::OutOfMemory {
                current: self.len(),
                requested: u64::MAX,
            })?;
        let mut content = self.content();
        if end > content.len() {
            grow(&mut content, end, may_grow)?;
        }
        content[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Truncates from the tail or zero-extends to exactly `len` bytes.
    /// `may_grow` is only consulted when the file gets longer.
    pub(crate) fn set_len<E>(
        &self,
        len: usize,
        may_grow: impl FnOnce(u64, u64) -> Result<(), E>,
    ) -> Result<(), GrowError<E>> {
        let mut content = self.content();
        if len < content.len() {
            content.truncate(len);
        } else if len > content.len() {
            grow(&mut content, len, may_grow)?;
        }
        Ok(())
    }
}

/// Zero-extends `content` to `len` bytes. Nothing changes unless both the
/// veto and the reservation pass.
fn grow<E>(
    content: &mut Vec<u8>,
    len: usize,
    may_grow: impl FnOnce(u64, u64) -> Result<(), E>,
) -> Result<(), GrowError<E>> {
    let current = content.len() as u64;
    may_grow(current, len as u64).map_err(GrowError::Vetoed)?;
    content
        .try_reserve_exact(len - content.len())
        .map_err(|_| GrowError::OutOfMemory {
            current,
            requested: len as u64,
        })?;
    content.resize(len, 0);
    Ok(())
}
