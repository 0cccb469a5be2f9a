use std::fmt;

use crate::name::NameError;

/// Result alias used by every storage operation.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors surfaced at the storage boundary.
///
/// Every failing operation leaves the namespace, file contents and handle
/// state exactly as they were before the call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("invalid file name {name:?}: {reason}")]
    InvalidCharacter { name: String, reason: NameError },
    #[error("invalid state: {0}")]
    InvalidState(#[from] InvalidState),
    #[error("file {0:?} does not exist")]
    NotFound(String),
    #[error("capacity allocator refused to grow {name:?} from {current} to {requested} bytes")]
    QuotaExceeded {
        name: String,
        current: u64,
        requested: u64,
    },
}

/// The reasons an operation can be rejected with [`ErrorKind::InvalidState`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidState {
    #[error("file handle is closed")]
    HandleClosed,
    #[error("file {0:?} has open handles")]
    FileOpen(String),
    #[error("destination {0:?} already exists")]
    DestinationExists(String),
    #[error("range at offset {offset} with length {len} is outside the addressable range")]
    OutOfRange { offset: u64, len: u64 },
    #[error("storage task has been closed")]
    TaskClosed,
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::InvalidCharacter { .. } => ErrorKind::InvalidCharacter,
            StorageError::InvalidState(_) => ErrorKind::InvalidState,
            StorageError::NotFound(_) => ErrorKind::NotFound,
            StorageError::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
        }
    }
}

/// Error kinds, independent of the message carried by a [`StorageError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCharacter,
    InvalidState,
    NotFound,
    QuotaExceeded,
}

impl ErrorKind {
    /// The DOM exception name this kind is reported as.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCharacter => "InvalidCharacterError",
            ErrorKind::InvalidState => "InvalidStateError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::QuotaExceeded => "QuotaExceededError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
