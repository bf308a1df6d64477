mod loader;
pub mod template;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::clock::SystemClock;
use crate::log::LogConfig;
use crate::wire::DEFAULT_ADDR;

pub use loader::{LoadError, config_dir, config_path, data_dir, load, try_load};

/// Top-level configuration for rectwatch.
///
/// Loaded from `~/.config/rectwatch/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// SQLite database settings.
    pub storage: StorageConfig,
    /// Overlap matching settings.
    pub matching: MatchingConfig,
    /// File logging settings.
    pub logging: LogConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on, e.g. "127.0.0.1:8090".
    pub bind: String,
    /// Number of worker threads serving requests.
    pub workers: usize,
    /// Seconds to wait on a client, both reading its request and writing the reply.
    pub read_timeout_secs: u64,
    /// Largest accepted request body in kilobytes.
    pub max_body_kb: usize,
}

/// SQLite database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. Defaults to `rectwatch.db` in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Number of read connections kept open.
    pub read_pool_size: usize,
    /// Milliseconds a connection waits on a locked database.
    pub busy_timeout_ms: u64,
}

/// Overlap matching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Wall clock used to stamp matches: "local" or "utc".
    pub clock: SystemClock,
    /// Reject queries containing a negative width or height.
    pub reject_negative_dimensions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_ADDR.into(),
            workers: 20,
            read_timeout_secs: 5,
            max_body_kb: 1024,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            read_pool_size: 4,
            busy_timeout_ms: 5000,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            clock: SystemClock::Local,
            reject_negative_dimensions: true,
        }
    }
}

impl StorageConfig {
    /// Resolves the database file, falling back to the data directory.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| data_dir().map(|d| d.join("rectwatch.db")))
    }
}

impl Config {
    /// Clamps server and storage values to safe ranges.
    pub fn validate(&mut self) {
        self.server.workers = self.server.workers.clamp(1, 256);
        self.server.read_timeout_secs = self.server.read_timeout_secs.clamp(1, 300);
        self.server.max_body_kb = self.server.max_body_kb.clamp(1, 65536);
        self.storage.read_pool_size = self.storage.read_pool_size.clamp(1, 8);
        self.storage.busy_timeout_ms = self.storage.busy_timeout_ms.min(60_000);
    }
}
