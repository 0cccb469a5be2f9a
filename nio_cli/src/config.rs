use std::{fs, path::Path};

use anyhow::Context;
use nio_core::EngineConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ORIGIN: &str = "nio://local";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CliConfig {
    /// Origin used when `--origin` is not given.
    pub origin: String,
    pub engine: EngineConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_owned(),
            engine: EngineConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads the config at `path`, or the defaults if the file is missing.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("could not parse config file {}", path.display()))
    }

    /// Writes the default config to `path` unless a file already exists.
    pub fn init(path: &Path) -> anyhow::Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(&Self::default())?;
        fs::write(path, text)
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        Ok(true)
    }
}
