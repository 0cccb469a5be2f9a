//! Origin scoping: one independent namespace per origin.

use dashmap::DashMap;
use nio_core::{CapacityAllocator, EngineConfig, Unbounded};
use std::sync::Arc;

use crate::{api::NativeIo, engine::Engine, sync::NativeIoSync};

/// Hands out the storage engine of each origin, creating it on first use.
///
/// Files created under one origin are invisible to every other origin.
/// Origin strings are opaque keys; deciding who may use an origin is up to
/// the caller.
#[derive(Clone, Debug)]
pub struct Origins {
    engines: Arc<DashMap<String, Engine>>,
    config: EngineConfig,
    capacity: Arc<dyn CapacityAllocator>,
}

impl Origins {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_capacity(config, Arc::new(Unbounded))
    }

    /// All engines created by this registry share `capacity`.
    pub fn with_capacity(config: EngineConfig, capacity: Arc<dyn CapacityAllocator>) -> Self {
        Self {
            engines: Arc::new(DashMap::new()),
            config,
            capacity,
        }
    }

    pub fn engine(&self, origin: &str) -> Engine {
        self.engines
            .entry(origin.to_owned())
            .or_insert_with(|| {
                tracing::debug!("origins: new storage engine for {}", origin);
                Engine::with_capacity(origin, self.config.clone(), self.capacity.clone())
            })
            .clone()
    }

    /// Blocking API for `origin`.
    pub fn sync(&self, origin: &str) -> NativeIoSync {
        NativeIoSync::new(self.engine(origin))
    }

    /// Async API for `origin`. Must be called from within a tokio runtime.
    pub fn nonblocking(&self, origin: &str) -> NativeIo {
        NativeIo::new(self.engine(origin))
    }

    /// Origins that have an engine, sorted.
    pub fn origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = self.engines.iter().map(|e| e.key().clone()).collect();
        origins.sort_unstable();
        origins
    }
}

impl Default for Origins {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
