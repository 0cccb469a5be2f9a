//! Flat-namespace file name rules.
//!
//! Names are opaque keys in a single-level namespace, so every character
//! that a path-based store would interpret is rejected outright.

use crate::error::{StorageError, StorageResult};

/// Characters that would introduce structure into a flat name.
pub const RESERVED_CHARACTERS: [char; 4] = ['/', '\\', ':', '.'];

/// Default upper bound on the byte length of a file name.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 100;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
    #[error("name is {len} bytes long (max: {max})")]
    TooLong { len: usize, max: usize },
    #[error("reserved character {0:?}")]
    ReservedCharacter(char),
    #[error("control character {0:?}")]
    ControlCharacter(char),
}

/// Validates file names against the namespace rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameValidator {
    max_len: usize,
}

impl NameValidator {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Checks `name`, returning the first rule it breaks.
    pub fn check(&self, name: &str) -> Result<(), NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.len() > self.max_len {
            return Err(NameError::TooLong {
                len: name.len(),
                max: self.max_len,
            });
        }
        for c in name.chars() {
            if RESERVED_CHARACTERS.contains(&c) {
                return Err(NameError::ReservedCharacter(c));
            }
            if c.is_control() {
                return Err(NameError::ControlCharacter(c));
            }
        }
        Ok(())
    }

    /// Like [`NameValidator::check`], but reports the failure as a
    /// [`StorageError::InvalidCharacter`].
    pub fn validate(&self, name: &str) -> StorageResult<()> {
        self.check(name).map_err(|reason| {
            tracing::debug!("rejected file name {:?}: {}", name, reason);
            StorageError::InvalidCharacter {
                name: name.to_owned(),
                reason,
            }
        })
    }
}

impl Default for NameValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NAME_LENGTH)
    }
}
