//! Configuration for DayLog
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DaylogError, Result};

/// Main configuration for a DayLog instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for partition files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── data_2024-05-01.txt
    ///     └── data_2024-05-02.txt
    pub data_dir: PathBuf,

    /// Upper bound on lock acquisition and scan time (None = wait forever)
    pub lock_timeout: Option<Duration>,

    // -------------------------------------------------------------------------
    // Query Configuration
    // -------------------------------------------------------------------------
    /// Page size used when a query omits one or passes a non-positive value
    pub default_page_size: usize,

    // -------------------------------------------------------------------------
    // Retention Configuration
    // -------------------------------------------------------------------------
    /// Partitions older than this many days are removed by the sweeper
    pub retain_days: u32,

    /// Time between retention sweeps
    pub sweep_interval: Duration,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            lock_timeout: None,
            default_page_size: 100,
            retain_days: 7,
            sweep_interval: Duration::from_secs(24 * 60 * 60),
            listen_addr: "0.0.0.0:9999".to_string(),
            max_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject values the store cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.retain_days == 0 {
            return Err(DaylogError::Config(
                "retain_days must be at least 1".to_string(),
            ));
        }
        if self.default_page_size == 0 {
            return Err(DaylogError::Config(
                "default_page_size must be positive".to_string(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(DaylogError::Config(
                "sweep_interval must be non-zero".to_string(),
            ));
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
    /// Set the data directory (root for all partitions)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Bound lock acquisition and scans by a timeout
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.config.lock_timeout = Some(timeout);
        self
    }

    /// Set the fallback page size
    pub fn default_page_size(mut self, size: usize) -> Self {
        self.config.default_page_size = size;
        self
    }

    /// Set the retention horizon in days
    pub fn retain_days(mut self, days: u32) -> Self {
        self.config.retain_days = days;
        self
    }

    /// Set the interval between retention sweeps
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
