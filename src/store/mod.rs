//! Store Module
//!
//! The day-partitioned line store.
//!
//! ## Responsibilities
//! - Append encoded records to the partition for a date
//! - Paginated scans that stop as soon as the page is filled
//! - Delete one line by rewriting the partition and renaming it into place
//! - Enumerate partitions for the retention sweeper
//!
//! ## Line Indices
//! Blank lines are skipped and do not count. A line that fails to decode
//! still counts, so page offsets stay stable around corrupt lines.

mod line_store;
mod page;

pub use line_store::LineStore;
pub use page::{PageRequest, PageResult};
