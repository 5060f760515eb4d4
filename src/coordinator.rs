//! Access Coordinator
//!
//! A single reader/writer lock spanning every partition.
//!
//! - Scans take it shared: any number may run together
//! - Append, delete and sweep take it exclusive: they block, and are
//!   blocked by, everything else
//!
//! With a timeout configured, acquisition gives up with
//! `DaylogError::Timeout` instead of waiting forever.

use std::time::Duration;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{DaylogError, Result};

/// Shared exclusion primitive for all Line Store operations
#[derive(Debug, Default)]
pub struct AccessCoordinator {
    lock: RwLock<()>,
    timeout: Option<Duration>,
}

impl AccessCoordinator {
    /// Coordinator that waits indefinitely for the lock
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinator that gives up after `timeout`
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            lock: RwLock::new(()),
            timeout,
        }
    }

    /// Configured acquisition timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Acquire shared (read) access
    pub fn shared(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, ()>> {
        match self.timeout {
            None => Ok(self.lock.read()),
            Some(timeout) => self
                .lock
                .try_read_for(timeout)
                .ok_or(DaylogError::Timeout { operation }),
        }
    }

    /// Acquire exclusive (write) access
    pub fn exclusive(&self, operation: &'static str) -> Result<RwLockWriteGuard<'_, ()>> {
        match self.timeout {
            None => Ok(self.lock.write()),
            Some(timeout) => self
                .lock
                .try_write_for(timeout)
                .ok_or(DaylogError::Timeout { operation }),
        }
    }
}
