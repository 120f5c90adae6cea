//! Configuration for the request codec
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{ReqError, Result};

/// Main configuration shared by encoders, decoders and the flat-file store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Encode Configuration
    // -------------------------------------------------------------------------
    /// Capacity (in bytes) a fresh request buffer starts with.
    /// Growth always doubles from here.
    pub initial_capacity: usize,

    /// Upper bound on a single request record (in bytes).
    /// Buffer growth past this fails with `OutOfMemory`, and decoders
    /// reject headers declaring more.
    pub max_request_size: usize,

    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the flat-file store, if known up front.
    /// A `config name=store_flatfile path=...` request overrides it.
    pub store_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_request_size: 16 * 1024 * 1024, // 16 MB
            store_root: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the invariants the codec relies on
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(ReqError::Config(
                "initial_capacity must be non-zero".to_string(),
            ));
        }
        if self.initial_capacity > self.max_request_size {
            return Err(ReqError::Config(format!(
                "initial_capacity ({}) exceeds max_request_size ({})",
                self.initial_capacity, self.max_request_size
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the starting capacity of request buffers (in bytes)
    pub fn initial_capacity(mut self, bytes: usize) -> Self {
        self.config.initial_capacity = bytes;
        self
    }

    /// Set the maximum size of a single request record (in bytes)
    pub fn max_request_size(mut self, bytes: usize) -> Self {
        self.config.max_request_size = bytes;
        self
    }

    /// Set the flat-file store root directory
    pub fn store_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_root = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
