//! Actors behind the async API.
//!
//! A storage actor runs the namespace calls (open, rename, delete, listing)
//! issued through one [`NativeIo`](crate::NativeIo), one at a time in
//! arrival order. Every file opened through it gets its own file actor
//! (see [`file`]), so I/O on different files proceeds concurrently while
//! operations on one file complete in submission order.

use nio_core::{InvalidState, StorageError, StorageResult};
use tokio::sync::{mpsc, oneshot};

use crate::engine::Engine;

pub(crate) mod file;

pub(crate) use file::FileActorHandle;

/// Messages sent from a `StorageActorHandle` to a `StorageActor`.
#[derive(Debug)]
pub(crate) enum StorageMessage {
    /// Opens (or creates) a file and returns a handle to its file actor.
    Open {
        name: String,
        responder: oneshot::Sender<StorageResult<FileActorHandle>>,
    },
    Rename {
        old_name: String,
        new_name: String,
        responder: oneshot::Sender<StorageResult<()>>,
    },
    Delete {
        name: String,
        responder: oneshot::Sender<StorageResult<()>>,
    },
    GetAll {
        responder: oneshot::Sender<Vec<String>>,
    },
    Shutdown {
        responder: oneshot::Sender<()>,
    },
}

struct StorageActor {
    engine: Engine,
    receiver: mpsc::Receiver<StorageMessage>,
}

impl StorageActor {
    async fn run(&mut self) {
        while let Some(msg) = self.receiver.recv().await {
            if let StorageMessage::Shutdown { responder } = msg {
                tracing::debug!("{}: storage actor shutting down", self.engine.origin());
                let _ = responder.send(());
                break;
            }
            self.process_msg(msg);
        }
    }

    fn process_msg(&mut self, msg: StorageMessage) {
        // Responders may have been dropped if the caller stopped waiting;
        // the operation still ran to completion, so the send error is ignored.
        match msg {
            StorageMessage::Open { name, responder } => {
                let result = self.engine.open(&name).map(FileActorHandle::spawn);
                let _ = responder.send(result);
            }
            StorageMessage::Rename {
                old_name,
                new_name,
                responder,
            } => {
                let _ = responder.send(self.engine.rename(&old_name, &new_name));
            }
            StorageMessage::Delete { name, responder } => {
                let _ = responder.send(self.engine.delete(&name));
            }
            StorageMessage::GetAll { responder } => {
                let _ = responder.send(self.engine.get_all());
            }
            StorageMessage::Shutdown { .. } => {
                // Handled in run loop
            }
        }
    }
}

/// A handle for communicating with a `StorageActor`. It can be cloned and
/// sent across threads.
#[derive(Clone, Debug)]
pub(crate) struct StorageActorHandle {
    sender: mpsc::Sender<StorageMessage>,
}

impl StorageActorHandle {
    /// Spawns a new `StorageActor` task and returns a handle to it.
    pub(crate) fn spawn(engine: Engine) -> Self {
        let (sender, receiver) = mpsc::channel(1024);
        let mut actor = StorageActor { engine, receiver };

        crate::spawn::spawn_task(async move {
            actor.run().await;
        });

        Self { sender }
    }

    /// Sends the message built by `msg` and waits for its reply.
    pub(crate) async fn request<R>(
        &self,
        msg: impl FnOnce(oneshot::Sender<R>) -> StorageMessage,
    ) -> StorageResult<R> {
        let (responder, receiver) = oneshot::channel();
        self.sender
            .send(msg(responder))
            .await
            .map_err(|_| task_closed())?;
        receiver.await.map_err(|_| task_closed())
    }

    pub(crate) async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        let _ = self
            .sender
            .send(StorageMessage::Shutdown { responder: tx })
            .await;
        let _ = rx.await;
    }
}

pub(crate) fn task_closed() -> StorageError {
    InvalidState::TaskClosed.into()
}
