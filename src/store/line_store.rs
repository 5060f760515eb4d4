//! Line Store
//!
//! Owns every partition file under the data directory.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use parking_lot::RwLockWriteGuard;
use serde::de::DeserializeOwned;

use crate::coordinator::AccessCoordinator;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{DaylogError, Result};
use crate::partition::{self, ParsedName};
use crate::record;

use super::{PageRequest, PageResult};

/// How many lines a scan reads between deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 256;

/// Append-only, day-partitioned line storage
///
/// ## Concurrency:
/// - `coordinator`: one RwLock over all partitions
///   - `scan_page`, `count_lines`, `partitions` → shared
///   - `append`, `delete_line`, sweeps → exclusive
/// - All methods use `&self`; wrap the store in an `Arc` to share it
pub struct LineStore {
    /// Directory holding the partition files
    data_dir: PathBuf,

    /// Global reader/writer exclusion
    coordinator: AccessCoordinator,

    /// Receives non-fatal failures
    sink: Arc<dyn DiagnosticSink>,
}

impl LineStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(data_dir, None, Arc::new(TracingSink))
    }

    /// Open with an explicit lock timeout and diagnostics sink
    pub fn with_options(
        data_dir: impl AsRef<Path>,
        lock_timeout: Option<Duration>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            data_dir,
            coordinator: AccessCoordinator::with_timeout(lock_timeout),
            sink,
        })
    }

    // =========================================================================
    // Append
    // =========================================================================

    /// Append one encoded line to the partition for `date`
    ///
    /// The line and its terminator go out in a single write while the
    /// exclusive lock is held, so concurrent appends never interleave.
    pub fn append(&self, date: NaiveDate, line: &str) -> Result<()> {
        if line.contains(['\n', '\r']) {
            return Err(DaylogError::InvalidArgument(
                "line must not contain a line terminator".to_string(),
            ));
        }
        if line.trim().is_empty() {
            return Err(DaylogError::InvalidArgument(
                "line must not be blank".to_string(),
            ));
        }

        let _guard = self.coordinator.exclusive("append")?;

        // The directory may have been removed out from under us
        fs::create_dir_all(&self.data_dir)?;

        let path = self.partition_path(date);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        file.write_all(&buf)?;
        file.flush()?;

        Ok(())
    }

    /// Encode a record and append it
    pub fn append_record<T: serde::Serialize + ?Sized>(
        &self,
        date: NaiveDate,
        record: &T,
    ) -> Result<()> {
        let line = record::encode(record)?;
        self.append(date, &line)
    }

    // =========================================================================
    // Scan
    // =========================================================================

    /// Read one page of records from the partition for `date`
    ///
    /// A missing partition yields an empty page. Lines that fail to decode
    /// are reported to the sink, left out of `records`, and still counted.
    pub fn scan_page<T: DeserializeOwned>(
        &self,
        date: NaiveDate,
        page: usize,
        page_size: usize,
    ) -> Result<PageResult<T>> {
        let request = PageRequest::new(date, page, page_size)?;
        self.scan(&request)
    }

    /// Scan with an already-validated request
    ///
    /// The scan does not stop exactly at the end of the page. To set
    /// `has_next` it reads on until it finds one more non-blank line,
    /// skipping any blank lines in between, and stops there without
    /// decoding that line. At most one non-blank line past the page is read.
    pub fn scan<T: DeserializeOwned>(&self, request: &PageRequest) -> Result<PageResult<T>> {
        let _guard = self.coordinator.shared("scan")?;
        let deadline = self.coordinator.timeout().map(|t| Instant::now() + t);

        let path = self.partition_path(request.date);
        let Some(mut lines) = self.open_lines(&path, "scan")? else {
            return Ok(PageResult::empty(request.page, request.page_size));
        };

        let range = request.range();
        let mut result = PageResult::empty(request.page, request.page_size);
        let mut read = 0usize;

        while let Some(line) = self.next_line(&mut lines, &path, "scan")? {
            read += 1;
            if read % DEADLINE_CHECK_INTERVAL == 0 {
                check_deadline(deadline)?;
            }

            if is_blank(&line) {
                continue;
            }

            // One line past the page is enough to know another page exists
            if result.scanned_lines >= range.end {
                result.has_next = true;
                break;
            }

            if result.scanned_lines >= range.start {
                let index = result.scanned_lines;
                match decode_line::<T>(&line) {
                    Ok(record) => result.records.push(record),
                    Err(e) => self.sink.report(Diagnostic::warning(
                        "scan",
                        format!("{} line {}: {}", path.display(), index + 1, e),
                    )),
                }
            }

            result.scanned_lines += 1;
        }

        Ok(result)
    }

    /// Exact number of non-blank lines in the partition for `date`
    pub fn count_lines(&self, date: NaiveDate) -> Result<usize> {
        let _guard = self.coordinator.shared("count")?;

        let path = self.partition_path(date);
        let Some(mut lines) = self.open_lines(&path, "count")? else {
            return Ok(0);
        };

        let mut count = 0;
        while let Some(line) = self.next_line(&mut lines, &path, "count")? {
            if !is_blank(&line) {
                count += 1;
            }
        }

        Ok(count)
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Remove the 1-based `line_number`-th non-blank line from a partition
    ///
    /// The surviving lines are written to a sibling temp file which is then
    /// renamed over the partition. Nothing observes a half-written file, and
    /// a failure before the rename leaves the original untouched.
    pub fn delete_line(&self, date: NaiveDate, line_number: usize) -> Result<()> {
        let _guard = self.coordinator.exclusive("delete")?;

        let path = self.partition_path(date);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DaylogError::NotFound { date });
            }
            Err(e) => return Err(e.into()),
        };

        let mut lines: Vec<&[u8]> = data
            .split(|&b| b == b'\n')
            .filter(|line| !is_blank(line))
            .collect();

        let total = lines.len();
        if line_number == 0 || line_number > total {
            return Err(DaylogError::OutOfRange {
                line: line_number,
                total,
            });
        }

        lines.remove(line_number - 1);

        let temp_path = partition::temp_path_for(&self.data_dir, date);
        if let Err(e) = rewrite(&path, &temp_path, &lines) {
            // Best effort; the original partition is still intact
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::debug!(
            "Deleted line {} of {} from {}",
            line_number,
            total,
            path.display()
        );

        Ok(())
    }

    // =========================================================================
    // Enumeration
    // =========================================================================

    /// Dates of all partitions present, oldest first
    ///
    /// Files that look like partitions but carry a malformed date are
    /// reported and skipped.
    pub fn partitions(&self) -> Result<Vec<NaiveDate>> {
        let _guard = self.coordinator.shared("list")?;

        let mut dates = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let name = entry.file_name();
            match partition::parse_file_name(&name.to_string_lossy()) {
                ParsedName::Partition(date) => dates.push(date),
                ParsedName::Malformed(e) => self.sink.report(Diagnostic::warning(
                    "list",
                    format!("skipping {:?}: {}", name, e),
                )),
                ParsedName::NotPartition => {}
            }
        }

        dates.sort();
        Ok(dates)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the partition file for `date`
    pub fn partition_path(&self, date: NaiveDate) -> PathBuf {
        partition::path_for(&self.data_dir, date)
    }

    /// Whether a partition file exists for `date`
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.partition_path(date).is_file()
    }

    /// Diagnostics sink shared with the sweeper
    pub fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }

    /// Exclusive access for operations outside the store (retention sweeps)
    pub(crate) fn lock_exclusive(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, ()>> {
        self.coordinator.exclusive(operation)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Open a partition for line reads; `None` if it does not exist
    fn open_lines(&self, path: &Path, operation: &'static str) -> Result<Option<BufReader<File>>> {
        match File::open(path) {
            Ok(file) => Ok(Some(BufReader::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                self.sink.report(Diagnostic::error(
                    operation,
                    format!("failed to open {}: {}", path.display(), e),
                ));
                Err(e.into())
            }
        }
    }

    /// Read the next raw line (without its terminator)
    fn next_line(
        &self,
        reader: &mut BufReader<File>,
        path: &Path,
        operation: &'static str,
    ) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                Ok(Some(buf))
            }
            Err(e) => {
                self.sink.report(Diagnostic::error(
                    operation,
                    format!("failed to read {}: {}", path.display(), e),
                ));
                Err(e.into())
            }
        }
    }
}

/// Whitespace-only lines are ignored by every operation
fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

fn decode_line<T: DeserializeOwned>(line: &[u8]) -> Result<T> {
    let text = std::str::from_utf8(line).map_err(|e| DaylogError::Decoding(e.to_string()))?;
    record::decode(text)
}

fn check_deadline(deadline: Option<Instant>) -> Result<()> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => {
            Err(DaylogError::Timeout { operation: "scan" })
        }
        _ => Ok(()),
    }
}

/// Write `lines` to `temp_path`, sync it, and rename it over `path`
fn rewrite(path: &Path, temp_path: &Path, lines: &[&[u8]]) -> io::Result<()> {
    let file = File::create(temp_path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line)?;
        writer.write_all(b"\n")?;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);

    fs::rename(temp_path, path)
}
