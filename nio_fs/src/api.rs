//! Non-blocking API: calls are submitted to actors and resolve later.

use bytes::Bytes;
use nio_core::StorageResult;

use crate::{
    actor::{FileActorHandle, StorageActorHandle, StorageMessage},
    engine::Engine,
    handle::FileHandle,
};

/// Async entry point to one origin's storage.
///
/// Every call has the same preconditions, results and error kinds as its
/// [`NativeIoSync`](crate::NativeIoSync) counterpart; only the delivery of
/// the result differs. Namespace calls made through one `NativeIo` (and its
/// clones) run in the order they were issued.
///
/// Must be created from within a tokio runtime.
///
/// ```rust
/// use nio_core::EngineConfig;
/// use nio_fs::{Engine, NativeIo};
///
/// # #[tokio::main]
/// # async fn main() -> nio_core::StorageResult<()> {
/// let io = NativeIo::new(Engine::new("https://example.com", EngineConfig::default()));
/// let file = io.open("test_file").await?;
/// file.close().await;
///
/// io.rename("test_file", "new_name").await?;
/// assert_eq!(io.get_all().await?, vec!["new_name".to_owned()]);
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct NativeIo {
    root: StorageActorHandle,
}

impl NativeIo {
    pub fn new(engine: Engine) -> Self {
        Self {
            root: StorageActorHandle::spawn(engine),
        }
    }

    /// Opens `name`, creating it if needed.
    pub async fn open(&self, name: &str) -> StorageResult<AsyncFile> {
        let actor = self
            .root
            .request(|responder| StorageMessage::Open {
                name: name.to_owned(),
                responder,
            })
            .await??;
        Ok(AsyncFile { actor })
    }

    /// Renames a closed file; fails if `new_name` exists.
    pub async fn rename(&self, old_name: &str, new_name: &str) -> StorageResult<()> {
        self.root
            .request(|responder| StorageMessage::Rename {
                old_name: old_name.to_owned(),
                new_name: new_name.to_owned(),
                responder,
            })
            .await?
    }

    /// Deletes a closed file.
    pub async fn delete(&self, name: &str) -> StorageResult<()> {
        self.root
            .request(|responder| StorageMessage::Delete {
                name: name.to_owned(),
                responder,
            })
            .await?
    }

    pub async fn get_all(&self) -> StorageResult<Vec<String>> {
        self.root
            .request(|responder| StorageMessage::GetAll { responder })
            .await
    }

    /// Stops the namespace actor. Files that are already open stay usable;
    /// later namespace calls fail with `InvalidState`.
    pub async fn shutdown(&self) {
        self.root.shutdown().await
    }
}

/// A file opened through [`NativeIo`].
///
/// Clones share one file actor, so operations submitted through any clone
/// complete in submission order. The file is closed by [`AsyncFile::close`],
/// or once the last clone is dropped.
#[derive(Clone, Debug)]
pub struct AsyncFile {
    actor: FileActorHandle,
}

impl AsyncFile {
    pub fn name(&self) -> &str {
        self.actor.name()
    }

    /// Reads into `buf` at `offset`, handing the buffer back together with
    /// the number of bytes that came from the file.
    pub async fn read(&self, mut buf: Vec<u8>, offset: u64) -> StorageResult<(Vec<u8>, usize)> {
        self.actor
            .execute(move |handle: &mut FileHandle| -> StorageResult<(Vec<u8>, usize)> {
                let read = handle.read(&mut buf, offset)?;
                Ok((buf, read))
            })
            .await?
    }

    pub async fn write(&self, bytes: impl Into<Bytes>, offset: u64) -> StorageResult<usize> {
        let bytes = bytes.into();
        self.actor
            .execute(move |handle| handle.write(&bytes, offset))
            .await?
    }

    pub async fn set_length(&self, len: u64) -> StorageResult<()> {
        self.actor
            .execute(move |handle| handle.set_length(len))
            .await?
    }

    pub async fn get_length(&self) -> StorageResult<u64> {
        self.actor.execute(|handle| handle.get_length()).await?
    }

    /// Closes the file once every previously submitted operation finished.
    /// Closing twice is a no-op.
    pub async fn close(&self) {
        // A stopped actor has already closed its handle.
        let _ = self.actor.execute(|handle| handle.close()).await;
    }
}
