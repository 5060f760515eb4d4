//! Partition naming
//!
//! Pure mapping between calendar dates and partition file names.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

use crate::error::{DaylogError, Result};

/// Date format embedded in partition names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Partition file name prefix
pub const FILE_PREFIX: &str = "data_";

/// Partition file name suffix
pub const FILE_SUFFIX: &str = ".txt";

/// Suffix appended to a partition path while it is being rewritten
const TEMP_SUFFIX: &str = ".tmp";

/// Outcome of parsing a directory entry name
#[derive(Debug)]
pub enum ParsedName {
    /// A well-formed partition name
    Partition(NaiveDate),

    /// Carries the partition markers but the date does not parse
    Malformed(DaylogError),

    /// Not a partition file at all
    NotPartition,
}

/// Current calendar date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a date the way it appears in partition names ("2024-05-01")
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a "YYYY-MM-DD" date
///
/// Only the zero-padded form is accepted, so a parsed date always formats
/// back to the same string and `path_for` reaches the file it came from.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DaylogError::InvalidDate(format!("{:?}: {}", s, e)))?;

    if format_date(date) != s {
        return Err(DaylogError::InvalidDate(format!(
            "{:?}: expected zero-padded YYYY-MM-DD",
            s
        )));
    }
    Ok(date)
}

/// Generate the partition path for a date
/// 2024-05-01 → "{dir}/data_2024-05-01.txt"
pub fn path_for(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}{}{}", FILE_PREFIX, format_date(date), FILE_SUFFIX))
}

/// Sibling path used while rewriting a partition
pub fn temp_path_for(dir: &Path, date: NaiveDate) -> PathBuf {
    let mut name = path_for(dir, date).into_os_string();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Parse a partition date from a file name
/// "data_2024-05-01.txt" → Partition(2024-05-01)
pub fn parse_file_name(name: &str) -> ParsedName {
    let Some(date_str) = name
        .strip_prefix(FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
    else {
        return ParsedName::NotPartition;
    };

    match parse_date(date_str) {
        Ok(date) => ParsedName::Partition(date),
        Err(e) => ParsedName::Malformed(e),
    }
}
