//! Miner configuration
//!
//! Stored as JSON. Every field is optional in the file; missing fields take
//! the values from [`MinerConfig::default`]. Command-line flags override
//! whatever was loaded.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::algorithm::batch::BatchConfig;
use crate::algorithm::{DEFAULT_BATCH_SIZE, ExecutionContext, HashError, Threshold};

/// Table size used when none is configured
pub const DEFAULT_TABLE_SIZE: u32 = 1 << 16;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Invalid config file format: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("Invalid hex in `{field}`: {source}")]
    InvalidHex {
        field: &'static str,
        source: hex::FromHexError,
    },

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(#[from] HashError),

    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),
}

/// Settings for table building and nonce search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Big-endian 256-bit threshold as hex, optional `0x` prefix
    pub threshold: String,
    /// Nonces per batch; the stop flag is checked between batches
    pub batch_size: usize,
    /// Worker threads for parallel batches
    pub threads: usize,
    /// Number of table entries to build
    pub table_size: u32,
    /// Message prefix hashed ahead of each nonce, as hex
    pub prefix: String,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::Q.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            threads: num_cpus::get(),
            table_size: DEFAULT_TABLE_SIZE,
            prefix: String::new(),
        }
    }
}

impl MinerConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check that every field parses and every count is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.threshold()?;
        self.prefix_bytes()?;
        if self.batch_size == 0 {
            return Err(ConfigError::Zero("batch_size"));
        }
        if self.threads == 0 {
            return Err(ConfigError::Zero("threads"));
        }
        Ok(())
    }

    pub fn threshold(&self) -> Result<Threshold, ConfigError> {
        Ok(Threshold::from_hex(&self.threshold)?)
    }

    pub fn prefix_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        decode_hex("prefix", &self.prefix)
    }

    /// Batch settings for the driver; parallel whenever more than one
    /// worker is configured.
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            batch_size: self.batch_size,
            context: if self.threads > 1 {
                ExecutionContext::Parallel
            } else {
                ExecutionContext::Sequential
            },
        }
    }
}

/// Decode hex with an optional `0x` prefix.
pub fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, ConfigError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|source| ConfigError::InvalidHex { field, source })
}
