use std::collections::BTreeMap;
use std::ops::AddAssign;
use std::path::PathBuf;

use serde::Serialize;

/// Line counts for one file or an aggregate of files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineStats {
    /// Every line, whatever its class
    pub total: u64,
    /// Lines that are empty after trimming
    pub blank: u64,
    /// Lines starting with a comment prefix after trimming
    pub comment: u64,
}

impl LineStats {
    /// Lines that are neither blank nor comment-like
    pub fn plain(&self) -> u64 {
        self.total - self.blank - self.comment
    }
}

impl AddAssign for LineStats {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.blank += rhs.blank;
        self.comment += rhs.comment;
    }
}

/// Per-extension aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionBucket {
    pub extension: String,
    /// Number of files matched by this pattern
    pub files: u64,
    pub lines: LineStats,
}

impl ExtensionBucket {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    #[default]
    Ok,
    RootNotFound,
}

/// Result of scanning one root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub root: PathBuf,
    pub totals: LineStats,
    /// Number of files that matched the filter
    pub file_count: u64,
    /// Per-file stats (only filled when requested)
    pub files: BTreeMap<PathBuf, LineStats>,
    /// Per-extension buckets (only filled when requested)
    pub extensions: BTreeMap<String, ExtensionBucket>,
    pub status: ScanStatus,
}

impl Report {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    /// Empty report for a root that does not exist
    pub fn not_found(root: PathBuf) -> Self {
        Self {
            root,
            status: ScanStatus::RootNotFound,
            ..Self::default()
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == ScanStatus::Ok
    }
}
