//! Shared result record written by every scan job.
//!
//! All mutation happens under a single mutex. Each operation is one critical
//! section, so a bucket is looked up or created and incremented atomically.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::report::{ExtensionBucket, LineStats, Report};

pub struct Aggregator {
    report: Mutex<Report>,
    per_extension: bool,
    per_file: bool,
}

impl Aggregator {
    pub fn new(root: PathBuf, per_extension: bool, per_file: bool) -> Self {
        Self {
            report: Mutex::new(Report::new(root)),
            per_extension,
            per_file,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Report> {
        // Critical sections are plain additions; a poisoned report is still consistent.
        self.report.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a matched file before it is scanned
    pub fn register_file(&self, path: &Path, extension: &str) {
        if !self.per_extension && !self.per_file {
            return;
        }

        let mut report = self.lock();
        if self.per_extension {
            report
                .extensions
                .entry(extension.to_string())
                .or_insert_with(|| ExtensionBucket::new(extension))
                .files += 1;
        }
        if self.per_file {
            report.files.entry(path.to_path_buf()).or_default();
        }
    }

    /// Fold one file's finished stats into the report
    pub fn record_file(&self, path: &Path, extension: &str, stats: LineStats) {
        let mut report = self.lock();
        report.totals += stats;
        report.file_count += 1;

        if self.per_extension {
            report
                .extensions
                .entry(extension.to_string())
                .or_insert_with(|| ExtensionBucket::new(extension))
                .lines += stats;
        }
        if self.per_file {
            report.files.insert(path.to_path_buf(), stats);
        }
    }

    pub fn into_report(self) -> Report {
        self.report.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}
