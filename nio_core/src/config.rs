use serde::{Deserialize, Serialize};

use crate::name::{DEFAULT_MAX_NAME_LENGTH, NameValidator};

/// Largest length any file may reach by default (1 GiB). Contents live in
/// memory, so the ceiling has to stay allocatable.
pub const DEFAULT_MAX_FILE_LENGTH: u64 = 1 << 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum file name length in bytes.
    pub max_name_length: usize,
    /// Addressable ceiling for file contents. Growth past it is refused and
    /// reads ending past it are rejected.
    pub max_file_length: u64,
}

impl EngineConfig {
    pub fn name_validator(&self) -> NameValidator {
        NameValidator::new(self.max_name_length)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_file_length: DEFAULT_MAX_FILE_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: EngineConfig = toml::from_str("max_name_length = 16").unwrap();
        assert_eq!(config.max_name_length, 16);
        assert_eq!(config.max_file_length, DEFAULT_MAX_FILE_LENGTH);

        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
