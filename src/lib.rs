//! # DayLog
//!
//! A day-partitioned, append-only log store with:
//! - One JSON Lines file per UTC calendar date
//! - Paginated scans that stop as soon as the page is full
//! - Single-line deletion via atomic rewrite
//! - Time-based retention sweeps on a background thread
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                 (thread per connection)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │          (defaults, command routing, retention)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Line Store  │◄─────────│  Sweeper    │
//!   │  (RwLock)   │          │ (interval)  │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────────────────┐
//!   │ data_YYYY-MM-DD.txt ... │
//!   └─────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod diagnostics;

pub mod record;
pub mod partition;
pub mod coordinator;
pub mod store;
pub mod retention;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DaylogError, Result};
pub use config::Config;
pub use engine::Engine;
pub use record::LogRecord;
pub use store::{LineStore, PageRequest, PageResult};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of DayLog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
