use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, info, warn};

use super::directory::{MatchedFile, list_directory};
use super::lines::count_lines;
use super::progress::{ProgressMonitor, ScanMessage, WalkCounters, WalkProgress};
use crate::aggregate::Aggregator;
use crate::config::ScanConfig;
use crate::error::{LocError, Result};
use crate::report::Report;

/// Lifecycle of one walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// Created, root not yet scheduled
    Pending,
    /// Root directory is being listed or its files counted
    Walking,
    /// Root is complete, descendants are still outstanding
    Draining,
    /// No outstanding work remains
    Done,
}

struct TrackerState {
    outstanding: usize,
    walk: WalkState,
}

/// Outstanding-task count guarded by one mutex. Every job is counted before
/// it is queued and released after it ran, including whatever it queued, so
/// reaching zero means no work can appear anymore.
struct Tracker {
    state: Mutex<TrackerState>,
    cvar: Condvar,
}

impl Tracker {
    fn new() -> Self {
        Self {
            state: Mutex::new(TrackerState {
                outstanding: 0,
                walk: WalkState::Pending,
            }),
            cvar: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn start(&self) {
        let mut state = self.lock();
        state.outstanding = 1;
        state.walk = WalkState::Walking;
    }

    fn add(&self, n: usize) {
        self.lock().outstanding += n;
    }

    fn root_completed(&self) {
        let mut state = self.lock();
        if state.walk == WalkState::Walking && state.outstanding > 0 {
            state.walk = WalkState::Draining;
            debug!(outstanding = state.outstanding, "root complete, draining");
        }
    }

    fn finish_one(&self) {
        let mut state = self.lock();
        state.outstanding -= 1;
        if state.outstanding == 0 && state.walk != WalkState::Pending {
            state.walk = WalkState::Done;
            self.cvar.notify_all();
        }
    }

    fn state(&self) -> WalkState {
        self.lock().walk
    }

    fn wait_done(&self) {
        let mut state = self.lock();
        while state.walk != WalkState::Done {
            state = self.cvar.wait(state).unwrap_or_else(|e| e.into_inner());
        }
    }
}

/// Files of one directory still being counted
struct PendingDir {
    path: PathBuf,
    remaining: AtomicUsize,
}

impl PendingDir {
    /// Returns true for the last file of the directory
    fn finish_file(&self) -> bool {
        self.remaining.fetch_sub(1, Ordering::AcqRel) == 1
    }
}

enum Job {
    Directory(PathBuf),
    File {
        file: MatchedFile,
        dir: Arc<PendingDir>,
    },
}

/// Releases one outstanding task even if the job panics
struct JobGuard<'a> {
    tracker: &'a Tracker,
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        self.tracker.finish_one();
    }
}

/// State shared by every worker of one walk
struct WalkContext<'a> {
    config: &'a ScanConfig,
    root: &'a Path,
    aggregator: Aggregator,
    counters: WalkCounters,
    tracker: Tracker,
    queue: Sender<Job>,
    failed: AtomicBool,
    failure: Mutex<Option<LocError>>,
}

impl WalkContext<'_> {
    /// Run jobs until `done` disconnects. The queue is empty by then.
    fn worker_loop(&self, jobs: Receiver<Job>, done: Receiver<()>) {
        loop {
            crossbeam_channel::select! {
                recv(jobs) -> job => match job {
                    Ok(job) => self.run(job),
                    Err(_) => break,
                },
                recv(done) -> _ => break,
            }
        }
    }

    fn run(&self, job: Job) {
        let _guard = JobGuard {
            tracker: &self.tracker,
        };
        if self.failed.load(Ordering::Relaxed) {
            return;
        }

        match job {
            Job::Directory(path) => self.scan_directory(&path),
            Job::File { file, dir } => self.scan_file(file, dir),
        }
    }

    /// Queue a job, or run it here when the queue is full
    fn enqueue(&self, job: Job) {
        self.tracker.add(1);
        match self.queue.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) | Err(TrySendError::Disconnected(job)) => self.run(job),
        }
    }

    fn scan_directory(&self, path: &Path) {
        let listing = match list_directory(path, &self.config.extensions) {
            Ok(listing) => listing,
            Err(e) => return self.fail(e),
        };
        debug!(
            path = %path.display(),
            subdirs = listing.subdirs.len(),
            files = listing.files.len(),
            "listed directory"
        );

        self.counters.discover_dirs(listing.subdirs.len() as u64);
        for subdir in listing.subdirs {
            self.enqueue(Job::Directory(subdir));
        }

        if listing.files.is_empty() {
            self.complete_dir(path);
            return;
        }

        for file in &listing.files {
            self.aggregator.register_file(&file.path, &file.extension);
        }

        let dir = Arc::new(PendingDir {
            path: path.to_path_buf(),
            remaining: AtomicUsize::new(listing.files.len()),
        });
        for file in listing.files {
            self.enqueue(Job::File {
                file,
                dir: Arc::clone(&dir),
            });
        }
    }

    fn scan_file(&self, file: MatchedFile, dir: Arc<PendingDir>) {
        let stats = match count_lines(&file.path) {
            Ok(stats) => stats,
            Err(e) => return self.fail(e),
        };
        self.aggregator
            .record_file(&file.path, &file.extension, stats);
        self.counters.count_file();

        if dir.finish_file() {
            self.complete_dir(&dir.path);
        }
    }

    fn complete_dir(&self, path: &Path) {
        self.counters.complete_dir();
        if path == self.root {
            self.tracker.root_completed();
        }
    }

    /// Keep the first error; later jobs drain without doing work
    fn fail(&self, err: LocError) {
        if !self.failed.swap(true, Ordering::SeqCst) {
            warn!(error = %err, "scan aborted");
            let mut slot = self.failure.lock().unwrap_or_else(|e| e.into_inner());
            *slot = Some(err);
        }
    }
}

/// The root must exist and be a directory
fn check_root(root: &Path) -> Result<()> {
    let metadata = fs::metadata(root).map_err(|_| LocError::PathNotFound(root.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(LocError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Concurrent line-count scanner for one directory tree
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan a directory tree in a background thread.
    /// Returns a receiver for progress updates and the handle yielding the report.
    pub fn scan(
        self,
        root_path: PathBuf,
    ) -> (Receiver<ScanMessage>, thread::JoinHandle<Result<Report>>) {
        let (tx, rx) = crossbeam_channel::unbounded();

        let handle = thread::spawn(move || self.scan_sync(root_path, Some(tx)));

        (rx, handle)
    }

    /// Scan on the calling thread. Progress goes to `tx` when given.
    pub fn scan_sync(&self, root_path: PathBuf, tx: Option<Sender<ScanMessage>>) -> Result<Report> {
        let send = |msg: ScanMessage| {
            if let Some(tx) = &tx {
                let _ = tx.send(msg);
            }
        };

        if let Err(e) = check_root(&root_path) {
            debug!(error = %e, "root not scannable");
            send(ScanMessage::Completed);
            return Ok(Report::not_found(root_path));
        }

        send(ScanMessage::Started(root_path.clone()));

        let workers = self.config.worker_count();
        info!(root = %root_path.display(), workers, "starting scan");

        let (job_tx, job_rx) = crossbeam_channel::bounded(self.config.queue_capacity.max(1));
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);

        let ctx = WalkContext {
            config: &self.config,
            root: &root_path,
            aggregator: Aggregator::new(
                root_path.clone(),
                self.config.per_extension,
                self.config.per_file,
            ),
            counters: WalkCounters::default(),
            tracker: Tracker::new(),
            queue: job_tx,
            failed: AtomicBool::new(false),
            failure: Mutex::new(None),
        };

        let panicked = thread::scope(|s| {
            let monitor_tx = tx.clone();
            let monitor_done = done_rx.clone();
            let counters = &ctx.counters;
            let interval = self.config.poll_interval;
            let monitor = s.spawn(move || {
                ProgressMonitor::new(counters, interval, monitor_tx).run(monitor_done)
            });

            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let jobs = job_rx.clone();
                    let done = done_rx.clone();
                    let ctx = &ctx;
                    s.spawn(move || ctx.worker_loop(jobs, done))
                })
                .collect();

            ctx.counters.discover_dirs(1);
            ctx.tracker.start();
            if let Err(TrySendError::Full(job) | TrySendError::Disconnected(job)) =
                ctx.queue.try_send(Job::Directory(root_path.clone()))
            {
                ctx.run(job);
            }

            ctx.tracker.wait_done();
            debug_assert_eq!(ctx.tracker.state(), WalkState::Done);
            // Wakes the monitor and stops the workers
            drop(done_tx);

            let mut panicked = false;
            for handle in handles {
                panicked |= handle.join().is_err();
            }
            panicked |= monitor.join().is_err();
            panicked
        });

        if panicked {
            send(ScanMessage::Failed(LocError::WorkerPanicked.to_string()));
            return Err(LocError::WorkerPanicked);
        }

        let failure = ctx.failure.into_inner().unwrap_or_else(|e| e.into_inner());
        if let Some(err) = failure {
            send(ScanMessage::Failed(err.to_string()));
            return Err(err);
        }

        let progress = ctx.counters.snapshot();
        let report = ctx.aggregator.into_report();
        info!(
            root = %root_path.display(),
            dirs = progress.completed_dirs,
            files = report.file_count,
            lines = report.totals.total,
            "scan finished"
        );

        Ok(report)
    }
}

/// Blocking scan that forwards each progress snapshot to `updater`, followed
/// by [`WalkProgress::COMPLETE`] once the walk is done. A scan that fails
/// returns its error without the completion sentinel.
pub fn total_of(
    root_path: impl Into<PathBuf>,
    config: ScanConfig,
    mut updater: Option<&mut dyn FnMut(WalkProgress)>,
) -> Result<Report> {
    let (rx, handle) = Scanner::new(config).scan(root_path.into());

    let mut completed = false;
    for msg in rx {
        match msg {
            ScanMessage::Progress(progress) => {
                if let Some(update) = updater.as_deref_mut() {
                    update(progress);
                }
            }
            ScanMessage::Completed => completed = true,
            ScanMessage::Started(_) | ScanMessage::Failed(_) => {}
        }
    }

    let report = handle.join().map_err(|_| LocError::WorkerPanicked)??;
    if completed {
        if let Some(update) = updater.as_deref_mut() {
            update(WalkProgress::COMPLETE);
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ExtensionFilter;
    use crate::report::{LineStats, ScanStatus};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn stats(total: u64, blank: u64, comment: u64) -> LineStats {
        LineStats {
            total,
            blank,
            comment,
        }
    }

    fn detailed(extensions: &[&str]) -> ScanConfig {
        ScanConfig {
            extensions: ExtensionFilter::new(extensions.iter().copied()),
            per_extension: true,
            per_file: true,
            ..ScanConfig::default()
        }
    }

    #[test]
    fn test_tracker_lifecycle() {
        let tracker = Tracker::new();
        assert_eq!(tracker.state(), WalkState::Pending);

        tracker.start();
        assert_eq!(tracker.state(), WalkState::Walking);
        tracker.add(2);
        tracker.root_completed();
        assert_eq!(tracker.state(), WalkState::Draining);

        tracker.finish_one();
        tracker.finish_one();
        assert_eq!(tracker.state(), WalkState::Draining);
        tracker.finish_one();
        assert_eq!(tracker.state(), WalkState::Done);
        tracker.wait_done();
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp = TempDir::new().unwrap();
        let scanner = Scanner::new(ScanConfig::default());
        let (rx, handle) = scanner.scan(temp.path().to_path_buf());

        // Drain messages
        for _ in rx {}

        let report = handle.join().unwrap().unwrap();
        assert_eq!(report.status, ScanStatus::Ok);
        assert_eq!(report.file_count, 0);
        assert_eq!(report.totals, LineStats::default());
    }

    #[test]
    fn test_root_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let report = Scanner::new(ScanConfig::default())
            .scan_sync(missing.clone(), None)
            .unwrap();

        assert_eq!(report.status, ScanStatus::RootNotFound);
        assert_eq!(report.root, missing);
        assert_eq!(report.totals.total, 0);
        assert_eq!(report.file_count, 0);
    }

    #[test]
    fn test_root_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.rs");
        fs::write(&file, "fn a() {}\n").unwrap();

        let report = Scanner::new(ScanConfig::default())
            .scan_sync(file, None)
            .unwrap();
        assert_eq!(report.status, ScanStatus::RootNotFound);
    }

    #[test]
    fn test_single_python_file_bucket() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "\n# hi\nx=1\n").unwrap();

        let report = Scanner::new(detailed(&[".py"]))
            .scan_sync(temp.path().to_path_buf(), None)
            .unwrap();

        let bucket = &report.extensions[".py"];
        assert_eq!(bucket.files, 1);
        assert_eq!(bucket.lines, stats(3, 1, 1));
    }

    #[test]
    fn test_nested_files_are_summed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("x.go"), "package x\n\n// doc\n").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/y.go"), "package y\nfunc y() {}\n").unwrap();
        fs::write(temp.path().join("sub/notes.md"), "# ignored\n").unwrap();

        let report = Scanner::new(detailed(&[".go"]))
            .scan_sync(temp.path().to_path_buf(), None)
            .unwrap();

        assert_eq!(report.file_count, 2);
        assert_eq!(report.totals, stats(5, 1, 1));
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[&temp.path().join("sub/y.go")], stats(2, 0, 0));
    }

    #[test]
    fn test_small_queue_runs_inline() {
        let temp = TempDir::new().unwrap();
        for d in 0..5 {
            let dir = temp.path().join(format!("d{d}"));
            fs::create_dir(&dir).unwrap();
            for f in 0..20 {
                fs::write(dir.join(format!("f{f}.rs")), "// a\nb\n\n").unwrap();
            }
        }

        let config = ScanConfig {
            queue_capacity: 1,
            num_threads: 2,
            ..detailed(&[".rs"])
        };
        let report = Scanner::new(config)
            .scan_sync(temp.path().to_path_buf(), None)
            .unwrap();

        assert_eq!(report.file_count, 100);
        assert_eq!(report.totals, stats(300, 100, 100));
        assert_eq!(report.extensions[".rs"].files, 100);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_fails_scan() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("ok.rs"), "fn ok() {}\n").unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone.rs"), temp.path().join("dangling.rs"))
            .unwrap();

        let result = Scanner::new(ScanConfig::default()).scan_sync(temp.path().to_path_buf(), None);
        match result {
            Err(LocError::Io { path, .. }) => assert_eq!(path, temp.path().join("dangling.rs")),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_total_of_failure_skips_sentinel() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone.rs"), temp.path().join("dangling.rs"))
            .unwrap();

        let mut seen = Vec::new();
        let updater: &mut dyn FnMut(WalkProgress) = &mut |p| seen.push(p);
        let result = total_of(temp.path(), ScanConfig::default(), Some(updater));

        assert!(matches!(result, Err(LocError::Io { .. })));
        assert!(seen.iter().all(|p| !p.is_complete()));
    }

    #[test]
    fn test_total_of_reports_progress_and_sentinel() {
        let temp = TempDir::new().unwrap();
        let mut dir = temp.path().to_path_buf();
        for depth in 0..6 {
            dir = dir.join(format!("level{depth}"));
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join("f.txt"), "line\n").unwrap();
        }

        let config = ScanConfig {
            poll_interval: Duration::from_millis(1),
            ..ScanConfig::default()
        };
        let mut seen = Vec::new();
        let updater: &mut dyn FnMut(WalkProgress) = &mut |p| seen.push(p);
        let report = total_of(temp.path(), config, Some(updater)).unwrap();

        assert_eq!(report.file_count, 6);
        assert_eq!(seen.last(), Some(&WalkProgress::COMPLETE));

        let snapshots: Vec<_> = seen.iter().filter(|p| !p.is_complete()).collect();
        assert!(!snapshots.is_empty());
        for pair in snapshots.windows(2) {
            assert!(pair[0].discovered_dirs <= pair[1].discovered_dirs);
            assert!(pair[0].completed_dirs <= pair[1].completed_dirs);
        }
        for p in &snapshots {
            assert!(p.completed_dirs <= p.discovered_dirs);
        }
        let last = snapshots.last().unwrap();
        assert_eq!(last.completed_dirs, last.discovered_dirs);
        assert_eq!(last.discovered_dirs, 7);
    }

    #[test]
    fn test_total_of_without_updater() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "//c\ncode\n").unwrap();

        let report = total_of(temp.path(), ScanConfig::default(), None).unwrap();
        assert_eq!(report.totals, stats(2, 0, 1));
    }
}
