//! Retention Module
//!
//! Time-based eviction of whole partitions.
//!
//! ## Rule
//! A partition dated D is removed once `now - D@00:00 UTC` exceeds
//! `retain_days * 24` hours, compared exactly rather than in whole hours.
//! With a 7-day horizon, the file for the 1st is kept through 00:00 on the
//! 8th and removed by any sweep after that instant.
//!
//! ## Scheduling
//! `Sweeper` runs one sweep immediately, then one per interval on its own
//! thread. Sweeps run back to back and never overlap.

mod sweep;
mod sweeper;

pub use sweep::{sweep, sweep_at, SweepReport};
pub use sweeper::Sweeper;
