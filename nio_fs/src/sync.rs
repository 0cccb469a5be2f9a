//! Blocking API: every call runs to completion on the caller's thread.

use nio_core::StorageResult;

use crate::{engine::Engine, handle::FileHandle};

/// Blocking entry point to one origin's storage.
///
/// ```rust
/// use nio_core::EngineConfig;
/// use nio_fs::{Engine, NativeIoSync};
///
/// # fn main() -> nio_core::StorageResult<()> {
/// let io = NativeIoSync::new(Engine::new("https://example.com", EngineConfig::default()));
/// let mut file = io.open("test_file")?;
/// file.write(&[10, 11, 12], 0)?;
/// file.set_length(5)?;
///
/// let mut buf = [0u8; 5];
/// file.read(&mut buf, 0)?;
/// assert_eq!(buf, [10, 11, 12, 0, 0]);
///
/// file.close();
/// io.delete("test_file")?;
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct NativeIoSync {
    engine: Engine,
}

impl NativeIoSync {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Opens `name`, creating it if needed.
    pub fn open(&self, name: &str) -> StorageResult<SyncFile> {
        let handle = self.engine.open(name)?;
        Ok(SyncFile { handle })
    }

    /// Renames a closed file; fails if `new_name` exists.
    pub fn rename(&self, old_name: &str, new_name: &str) -> StorageResult<()> {
        self.engine.rename(old_name, new_name)
    }

    /// Deletes a closed file.
    pub fn delete(&self, name: &str) -> StorageResult<()> {
        self.engine.delete(name)
    }

    pub fn get_all(&self) -> StorageResult<Vec<String>> {
        Ok(self.engine.get_all())
    }
}

/// A file opened through [`NativeIoSync`].
#[derive(Debug)]
pub struct SyncFile {
    handle: FileHandle,
}

impl SyncFile {
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn read(&mut self, buf: &mut [u8], offset: u64) -> StorageResult<usize> {
        self.handle.read(buf, offset)
    }

    pub fn write(&mut self, bytes: &[u8], offset: u64) -> StorageResult<usize> {
        self.handle.write(bytes, offset)
    }

    pub fn set_length(&mut self, len: u64) -> StorageResult<()> {
        self.handle.set_length(len)
    }

    pub fn get_length(&self) -> StorageResult<u64> {
        self.handle.get_length()
    }

    pub fn close(&mut self) {
        self.handle.close()
    }
}
