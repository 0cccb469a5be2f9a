//! The actor that owns one open [`FileHandle`].

use nio_core::StorageResult;
use tokio::sync::{mpsc, oneshot};

use super::task_closed;
use crate::handle::FileHandle;

/// A unit of work run against the actor's file handle.
pub(crate) trait Task: std::fmt::Debug + Send {
    fn execute(self: Box<Self>, handle: &mut FileHandle);
}

/// A concrete `Task` that executes a function and sends the result back.
struct FunctionTask<R> {
    func: Box<dyn FnOnce(&mut FileHandle) -> R + Send>,
    responder: oneshot::Sender<R>,
}

impl<R: Send> std::fmt::Debug for FunctionTask<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FunctionTask")
    }
}

impl<R: Send> Task for FunctionTask<R> {
    fn execute(self: Box<Self>, handle: &mut FileHandle) {
        let result = (self.func)(handle);
        // The receiver might have been dropped if the caller doesn't care
        // about the result, so we ignore the potential error.
        let _ = self.responder.send(result);
    }
}

struct FileActor {
    handle: FileHandle,
    receiver: mpsc::Receiver<Box<dyn Task>>,
}

impl FileActor {
    async fn run(&mut self) {
        while let Some(task) = self.receiver.recv().await {
            task.execute(&mut self.handle);
        }
        // Every `FileActorHandle` is gone: nobody can close the file any
        // more, so release it here.
        self.handle.close();
        tracing::debug!("file actor for {} stopped", self.handle.name());
    }
}

/// A handle for communicating with a `FileActor`. Tasks sent through any
/// clone run in the order they were sent.
#[derive(Clone, Debug)]
pub(crate) struct FileActorHandle {
    name: std::sync::Arc<str>,
    sender: mpsc::Sender<Box<dyn Task>>,
}

impl FileActorHandle {
    /// Spawns a new `FileActor` owning `handle`.
    pub(crate) fn spawn(handle: FileHandle) -> Self {
        let (sender, receiver) = mpsc::channel(1024);
        let name = handle.name().into();
        let mut actor = FileActor { handle, receiver };

        crate::spawn::spawn_task(async move {
            actor.run().await;
        });

        Self { name, sender }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Submits a function to be executed by the actor on its file handle.
    pub(crate) async fn execute<F, R>(&self, f: F) -> StorageResult<R>
    where
        F: FnOnce(&mut FileHandle) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (responder, receiver) = oneshot::channel();
        let task = Box::new(FunctionTask {
            func: Box::new(f),
            responder,
        });

        if self.sender.send(task).await.is_err() {
            return Err(task_closed());
        }

        receiver.await.map_err(|_| task_closed())
    }
}
