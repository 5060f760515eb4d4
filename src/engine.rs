//! Engine Module
//!
//! The facade request handlers talk to.
//!
//! ## Responsibilities
//! - Open the data directory and the Line Store on startup
//! - Apply request defaults (today's date, page 1, default page size)
//! - Route protocol commands to store operations
//! - Start the retention sweeper for the server

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::Config;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{DaylogError, Result};
use crate::partition;
use crate::protocol::Command;
use crate::record::LogRecord;
use crate::retention::{self, SweepReport, Sweeper};
use crate::store::{LineStore, PageResult};

/// The main log engine
///
/// ## Concurrency Model
/// The engine adds no locking of its own; every call goes straight to the
/// Line Store, which serializes through its access coordinator. Share one
/// engine across handler threads with an `Arc`.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Partition storage (shared with the sweeper thread)
    store: Arc<LineStore>,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// Fails if the config is invalid or the data directory cannot be
    /// created; both are startup preconditions.
    pub fn open(config: Config) -> Result<Self> {
        Self::open_with_sink(config, Arc::new(TracingSink))
    }

    /// Open with a custom diagnostics sink
    pub fn open_with_sink(config: Config, sink: Arc<dyn DiagnosticSink>) -> Result<Self> {
        config.validate()?;

        let store = LineStore::with_options(&config.data_dir, config.lock_timeout, sink)?;

        tracing::info!(
            "Engine opened at {} (retain {} days)",
            config.data_dir.display(),
            config.retain_days
        );

        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers. READ returns the page as
    /// JSON; the other commands return no payload.
    pub fn execute(&self, command: Command) -> Result<Option<Vec<u8>>> {
        match command {
            Command::Write { record } => {
                let record: LogRecord = crate::record::decode(
                    std::str::from_utf8(&record)
                        .map_err(|e| DaylogError::Decoding(e.to_string()))?,
                )?;
                self.ingest(&record)?;
                Ok(None)
            }
            Command::Read {
                date,
                page,
                page_size,
            } => {
                let date = parse_optional_date(&date)?;
                let result = self.query(date, Some(page as usize), Some(page_size as usize))?;
                let body = serde_json::to_vec(&result)
                    .map_err(|e| DaylogError::Encoding(e.to_string()))?;
                Ok(Some(body))
            }
            Command::Delete { date, line } => {
                let date = parse_optional_date(&date)?;
                self.delete(date, line as usize)?;
                Ok(None)
            }
            Command::Ping => Ok(Some(b"PONG".to_vec())),
        }
    }

    // =========================================================================
    // Ingest / Query / Delete
    // =========================================================================

    /// Append a record to today's partition
    pub fn ingest(&self, record: &LogRecord) -> Result<()> {
        self.ingest_on(partition::today(), record)
    }

    /// Append a record to the partition for `date`
    pub fn ingest_on(&self, date: NaiveDate, record: &LogRecord) -> Result<()> {
        self.store.append_record(date, record)
    }

    /// Read a page, applying defaults
    ///
    /// - `date`: today when `None`
    /// - `page`: 1 when `None` or 0
    /// - `page_size`: the configured default when `None` or 0
    pub fn query(
        &self,
        date: Option<NaiveDate>,
        page: Option<usize>,
        page_size: Option<usize>,
    ) -> Result<PageResult> {
        let date = date.unwrap_or_else(partition::today);
        let page = page.filter(|&p| p >= 1).unwrap_or(1);
        let page_size = page_size
            .filter(|&s| s > 0)
            .unwrap_or(self.config.default_page_size);

        self.store.scan_page(date, page, page_size)
    }

    /// Delete the 1-based `line` from the partition for `date` (today when `None`)
    pub fn delete(&self, date: Option<NaiveDate>, line: usize) -> Result<()> {
        let date = date.unwrap_or_else(partition::today);
        self.store.delete_line(date, line)
    }

    // =========================================================================
    // Retention
    // =========================================================================

    /// Run one retention pass with the configured horizon
    pub fn sweep(&self) -> SweepReport {
        retention::sweep(&self.store, self.config.retain_days)
    }

    /// Start the background sweeper with the configured horizon and interval
    pub fn start_sweeper(&self) -> Result<Sweeper> {
        Sweeper::start(
            Arc::clone(&self.store),
            self.config.retain_days,
            self.config.sweep_interval,
        )
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the underlying store
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Empty string means "today"
fn parse_optional_date(date: &str) -> Result<Option<NaiveDate>> {
    if date.is_empty() {
        Ok(None)
    } else {
        partition::parse_date(date).map(Some)
    }
}
