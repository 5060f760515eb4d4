//! Single retention pass

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::diagnostics::Diagnostic;
use crate::partition::{self, ParsedName};
use crate::store::LineStore;

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Partitions deleted
    pub removed: Vec<NaiveDate>,

    /// Files with partition markers but a date that is not zero-padded YYYY-MM-DD
    pub skipped: Vec<String>,

    /// Expired partitions that could not be deleted
    pub failed: Vec<PathBuf>,
}

/// Sweep relative to the current time
pub fn sweep(store: &LineStore, retain_days: u32) -> SweepReport {
    sweep_at(store, retain_days, Utc::now())
}

/// Sweep relative to `now`
///
/// Runs under exclusive access. Nothing here aborts the pass: every
/// failure is reported to the store's sink and the sweep moves on.
pub fn sweep_at(store: &LineStore, retain_days: u32, now: DateTime<Utc>) -> SweepReport {
    let mut report = SweepReport::default();
    let sink = store.sink();

    let _guard = match store.lock_exclusive("sweep") {
        Ok(guard) => guard,
        Err(e) => {
            sink.report(Diagnostic::error("sweep", e.to_string()));
            return report;
        }
    };

    let entries = match fs::read_dir(store.data_dir()) {
        Ok(entries) => entries,
        Err(e) => {
            sink.report(Diagnostic::error(
                "sweep",
                format!("failed to read {}: {}", store.data_dir().display(), e),
            ));
            return report;
        }
    };

    let horizon = Duration::hours(i64::from(retain_days) * 24);

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                sink.report(Diagnostic::error("sweep", e.to_string()));
                continue;
            }
        };

        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let date = match partition::parse_file_name(&name) {
            ParsedName::Partition(date) => date,
            ParsedName::Malformed(e) => {
                sink.report(Diagnostic::warning(
                    "sweep",
                    format!("skipping {}: {}", name, e),
                ));
                report.skipped.push(name);
                continue;
            }
            ParsedName::NotPartition => continue,
        };

        if age(date, now) <= horizon {
            continue;
        }

        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("Removed expired partition {}", path.display());
                report.removed.push(date);
            }
            Err(e) => {
                sink.report(Diagnostic::error(
                    "sweep",
                    format!("failed to remove {}: {}", path.display(), e),
                ));
                report.failed.push(path);
            }
        }
    }

    report.removed.sort();
    report
}

/// Time elapsed since midnight UTC of `date`
fn age(date: NaiveDate, now: DateTime<Utc>) -> Duration {
    now - date.and_time(NaiveTime::MIN).and_utc()
}
