use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// Progress update during scanning
#[derive(Debug, Clone)]
pub enum ScanMessage {
    /// Started walking a root
    Started(PathBuf),
    /// Periodic counter snapshot
    Progress(WalkProgress),
    /// Walk finished (sent exactly once)
    Completed,
    /// Walk failed with an I/O error
    Failed(String),
}

/// Walk counters as seen by an observer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkProgress {
    /// Directories known to exist, root included
    pub discovered_dirs: u64,
    /// Directories whose own files are fully counted
    pub completed_dirs: u64,
    /// Files whose lines are counted
    pub files_counted: u64,
}

impl WalkProgress {
    /// Sentinel passed to plain callbacks once the walk is done
    pub const COMPLETE: WalkProgress = WalkProgress {
        discovered_dirs: u64::MAX,
        completed_dirs: u64::MAX,
        files_counted: u64::MAX,
    };

    pub fn is_complete(&self) -> bool {
        *self == Self::COMPLETE
    }

    pub fn pending_dirs(&self) -> u64 {
        self.discovered_dirs.saturating_sub(self.completed_dirs)
    }
}

/// Live counters owned by the walker
#[derive(Debug, Default)]
pub(crate) struct WalkCounters {
    discovered_dirs: AtomicU64,
    completed_dirs: AtomicU64,
    files_counted: AtomicU64,
}

impl WalkCounters {
    pub(crate) fn discover_dirs(&self, n: u64) {
        self.discovered_dirs.fetch_add(n, Ordering::SeqCst);
    }

    pub(crate) fn complete_dir(&self) {
        self.completed_dirs.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn count_file(&self) {
        self.files_counted.fetch_add(1, Ordering::Relaxed);
    }

    /// Completed is read first so a snapshot never shows more completed
    /// than discovered directories.
    pub(crate) fn snapshot(&self) -> WalkProgress {
        let completed_dirs = self.completed_dirs.load(Ordering::SeqCst);
        let files_counted = self.files_counted.load(Ordering::Relaxed);
        let discovered_dirs = self.discovered_dirs.load(Ordering::SeqCst);
        WalkProgress {
            discovered_dirs,
            completed_dirs,
            files_counted,
        }
    }
}

/// Samples the walk counters on a fixed cadence until the walk is done.
///
/// `done` is never sent on; the walker drops its sender when the outstanding
/// task count reaches zero, which wakes the monitor immediately.
pub(crate) struct ProgressMonitor<'a> {
    counters: &'a WalkCounters,
    interval: Duration,
    tx: Option<Sender<ScanMessage>>,
}

impl<'a> ProgressMonitor<'a> {
    pub(crate) fn new(
        counters: &'a WalkCounters,
        interval: Duration,
        tx: Option<Sender<ScanMessage>>,
    ) -> Self {
        Self {
            counters,
            interval,
            tx,
        }
    }

    pub(crate) fn run(self, done: Receiver<()>) {
        loop {
            match done.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => {
                    self.send(ScanMessage::Progress(self.counters.snapshot()));
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        // Final counters, then the one completion signal
        self.send(ScanMessage::Progress(self.counters.snapshot()));
        self.send(ScanMessage::Completed);
    }

    fn send(&self, msg: ScanMessage) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(msg);
        }
    }
}
