use std::collections::HashMap;

use anyhow::{Context, bail};
use nio_core::StorageError;
use nio_fs::{AsyncFile, Engine, NativeIo, NativeIoSync, SyncFile};

use crate::script::Command;

enum Backend {
    Blocking {
        io: NativeIoSync,
        files: HashMap<String, SyncFile>,
    },
    NonBlocking {
        io: NativeIo,
        files: HashMap<String, AsyncFile>,
    },
}

/// Executes script commands against one origin, keeping open files by id.
pub struct Session {
    backend: Backend,
    max_read: u64,
}

impl Session {
    pub fn blocking(engine: Engine) -> Self {
        Self {
            max_read: engine.config().max_file_length,
            backend: Backend::Blocking {
                io: NativeIoSync::new(engine),
                files: HashMap::new(),
            },
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn nonblocking(engine: Engine) -> Self {
        Self {
            max_read: engine.config().max_file_length,
            backend: Backend::NonBlocking {
                io: NativeIo::new(engine),
                files: HashMap::new(),
            },
        }
    }

    /// Runs one command and returns the line to print.
    pub async fn execute(&mut self, command: Command) -> anyhow::Result<String> {
        if let Command::Read { len, .. } = &command {
            check_read_len(*len, self.max_read)?;
        }
        match &mut self.backend {
            Backend::Blocking { io, files } => execute_blocking(io, files, command),
            Backend::NonBlocking { io, files } => execute_nonblocking(io, files, command).await,
        }
    }

    /// Closes every file still open in this session.
    pub async fn close_all(&mut self) {
        match &mut self.backend {
            Backend::Blocking { files, .. } => {
                for (_, mut file) in files.drain() {
                    file.close();
                }
            }
            Backend::NonBlocking { io, files } => {
                for (_, file) in files.drain() {
                    file.close().await;
                }
                io.shutdown().await;
            }
        }
    }
}

fn execute_blocking(
    io: &NativeIoSync,
    files: &mut HashMap<String, SyncFile>,
    command: Command,
) -> anyhow::Result<String> {
    let out = match command {
        Command::Open { id, name } => {
            if files.contains_key(&id) {
                bail!("id '{}' is already in use", id);
            }
            let file = io.open(&name)?;
            files.insert(id, file);
            "ok".to_owned()
        }
        Command::Close { id } => {
            let mut file = files.remove(&id).with_context(|| unknown_id(&id))?;
            file.close();
            "ok".to_owned()
        }
        Command::Read { id, offset, len } => {
            let file = files.get_mut(&id).with_context(|| unknown_id(&id))?;
            let mut buf = read_buffer(len)?;
            let read = file.read(&mut buf, offset)?;
            format_read(read, &buf)
        }
        Command::Write { id, offset, bytes } => {
            let file = files.get_mut(&id).with_context(|| unknown_id(&id))?;
            file.write(&bytes, offset)?.to_string()
        }
        Command::SetLength { id, len } => {
            let file = files.get_mut(&id).with_context(|| unknown_id(&id))?;
            file.set_length(len)?;
            "ok".to_owned()
        }
        Command::GetLength { id } => {
            let file = files.get(&id).with_context(|| unknown_id(&id))?;
            file.get_length()?.to_string()
        }
        Command::Rename { old_name, new_name } => {
            io.rename(&old_name, &new_name)?;
            "ok".to_owned()
        }
        Command::Delete { name } => {
            io.delete(&name)?;
            "ok".to_owned()
        }
        Command::List => io.get_all()?.join("\n"),
    };
    Ok(out)
}

async fn execute_nonblocking(
    io: &NativeIo,
    files: &mut HashMap<String, AsyncFile>,
    command: Command,
) -> anyhow::Result<String> {
    let out = match command {
        Command::Open { id, name } => {
            if files.contains_key(&id) {
                bail!("id '{}' is already in use", id);
            }
            let file = io.open(&name).await?;
            files.insert(id, file);
            "ok".to_owned()
        }
        Command::Close { id } => {
            let file = files.remove(&id).with_context(|| unknown_id(&id))?;
            file.close().await;
            "ok".to_owned()
        }
        Command::Read { id, offset, len } => {
            let file = files.get(&id).with_context(|| unknown_id(&id))?;
            let (buf, read) = file.read(read_buffer(len)?, offset).await?;
            format_read(read, &buf)
        }
        Command::Write { id, offset, bytes } => {
            let file = files.get(&id).with_context(|| unknown_id(&id))?;
            file.write(bytes, offset).await?.to_string()
        }
        Command::SetLength { id, len } => {
            let file = files.get(&id).with_context(|| unknown_id(&id))?;
            file.set_length(len).await?;
            "ok".to_owned()
        }
        Command::GetLength { id } => {
            let file = files.get(&id).with_context(|| unknown_id(&id))?;
            file.get_length().await?.to_string()
        }
        Command::Rename { old_name, new_name } => {
            io.rename(&old_name, &new_name).await?;
            "ok".to_owned()
        }
        Command::Delete { name } => {
            io.delete(&name).await?;
            "ok".to_owned()
        }
        Command::List => io.get_all().await?.join("\n"),
    };
    Ok(out)
}

fn unknown_id(id: &str) -> String {
    format!("no open file with id '{}'", id)
}

/// Reads can never return more than a file may hold, so longer ones are
/// refused before any buffer is allocated.
fn check_read_len(len: usize, max: u64) -> anyhow::Result<()> {
    if len as u64 > max {
        bail!(
            "read length {} exceeds the file length limit of {} bytes",
            len,
            max
        );
    }
    Ok(())
}

fn read_buffer(len: usize) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .with_context(|| format!("cannot allocate {} bytes to read into", len))?;
    buf.resize(len, 0);
    Ok(buf)
}

fn format_read(read: usize, buf: &[u8]) -> String {
    format!("{} {}", read, hex::encode(buf))
}

/// Renders a failed command; storage failures lead with their DOM name.
pub fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<StorageError>() {
        Some(storage) => format!("{}: {}", storage.kind(), storage),
        None => format!("error: {:#}", err),
    }
}
