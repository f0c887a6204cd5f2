//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Default artwork cache budget: 32 MiB
pub const DEFAULT_MAX_BYTES: i64 = 32 * 1024 * 1024;

/// Artwork cache configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory whose artwork files are loaded
    pub artwork_dir: PathBuf,
    /// Cache capacity in bytes
    pub max_bytes: i64,
    /// Optional capacity to shrink to after loading
    pub trim_bytes: Option<i64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ARTWORK_DIR` - Artwork directory (default: `.`)
    /// - `CACHE_MAX_BYTES` - Cache capacity in bytes (default: 32 MiB)
    /// - `CACHE_TRIM_BYTES` - Capacity to resize to after loading (default: unset)
    pub fn from_env() -> Self {
        Self {
            artwork_dir: env::var("ARTWORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            max_bytes: env::var("CACHE_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BYTES),
            trim_bytes: env::var("CACHE_TRIM_BYTES")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artwork_dir: PathBuf::from("."),
            max_bytes: DEFAULT_MAX_BYTES,
            trim_bytes: None,
        }
    }
}
