//! Page request/result types

use std::ops::Range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DaylogError, Result};
use crate::record::LogRecord;

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub date: NaiveDate,

    /// 1-based page number
    pub page: usize,

    /// Lines per page (> 0)
    pub page_size: usize,
}

impl PageRequest {
    /// Validate page and page size
    pub fn new(date: NaiveDate, page: usize, page_size: usize) -> Result<Self> {
        if page == 0 {
            return Err(DaylogError::InvalidArgument(
                "page numbers start at 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(DaylogError::InvalidArgument(
                "page size must be positive".to_string(),
            ));
        }
        if page.checked_mul(page_size).is_none() {
            return Err(DaylogError::InvalidArgument(format!(
                "page {} of size {} is out of addressable range",
                page, page_size
            )));
        }

        Ok(Self {
            date,
            page,
            page_size,
        })
    }

    /// Half-open range of line indices covered by this page
    pub fn range(&self) -> Range<usize> {
        let start = (self.page - 1) * self.page_size;
        start..start + self.page_size
    }
}

/// One page of decoded records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T = LogRecord> {
    /// Records that decoded successfully, in append order
    pub records: Vec<T>,

    /// Non-blank lines counted before the scan stopped
    pub scanned_lines: usize,

    /// Whether at least one more line exists past this page
    pub has_next: bool,

    pub page: usize,
    pub page_size: usize,
}

impl<T> PageResult<T> {
    /// Result for a partition that does not exist
    pub fn empty(page: usize, page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            scanned_lines: 0,
            has_next: false,
            page,
            page_size,
        }
    }

    /// Whether the page came back with exactly `page_size` records
    ///
    /// Best-effort "next page" hint: wrong when the following lines are all
    /// malformed or the partition ends exactly on the page boundary. Use
    /// `has_next` for the exact answer.
    pub fn is_full(&self) -> bool {
        self.records.len() == self.page_size
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
