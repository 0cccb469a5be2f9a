//! # NIO core
//!
//! Types and traits shared by every NIO crate:
//!
//! - [`StorageError`] / [`ErrorKind`]: the error taxonomy surfaced at the
//!   storage boundary, identical for blocking and non-blocking callers.
//! - [`NameValidator`]: the flat-namespace naming rules.
//! - [`CapacityAllocator`]: the seam through which an external allocator
//!   may refuse file growth.
//! - [`EngineConfig`]: tunables for a storage engine.

pub mod capacity;
pub mod config;
pub mod error;
pub mod name;

pub use capacity::{CapacityAllocator, Unbounded};
pub use config::{DEFAULT_MAX_FILE_LENGTH, EngineConfig};
pub use error::{ErrorKind, InvalidState, StorageError, StorageResult};
pub use name::{NameError, NameValidator, RESERVED_CHARACTERS};
