//! # NIO file storage
//!
//! Origin-scoped storage of byte-addressable files in a flat namespace,
//! reachable through a blocking and a non-blocking API with identical
//! semantics.
//!
//! ## Layers
//! 1. `record` / `table` – per-file content and the name → file registry.
//! 2. `engine` – one origin's namespace; checks every precondition before
//!    mutating anything, so each call is all-or-nothing.
//! 3. `handle` – open sessions on a file (read, write, length management).
//! 4. `sync` / `api` – the blocking façade ([`NativeIoSync`]) and the async
//!    façade ([`NativeIo`]), the latter backed by actors.
//! 5. `origins` – one engine per origin.

mod actor;
mod api;
mod engine;
mod handle;
mod origins;
pub mod record;
mod spawn;
mod sync;
pub mod table;

pub use api::{AsyncFile, NativeIo};
pub use engine::Engine;
pub use handle::FileHandle;
pub use origins::Origins;
pub use sync::{NativeIoSync, SyncFile};
