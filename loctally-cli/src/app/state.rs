use std::path::PathBuf;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, TryRecvError};
use loctally_core::{Report, Result as ScanResult, ScanConfig, ScanMessage, Scanner, WalkProgress};
use serde::Serialize;
use tracing::debug;

/// Final result for one path argument
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ScanOutcome {
    Finished(Report),
    Failed { root: PathBuf, error: String },
}

impl ScanOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ScanOutcome::Failed { .. })
    }
}

/// One in-flight scan
pub struct ScanSession {
    pub root: PathBuf,
    pub progress: WalkProgress,
    pub completed: bool,
    rx: Receiver<ScanMessage>,
    handle: Option<JoinHandle<ScanResult<Report>>>,
    disconnected: bool,
}

impl ScanSession {
    fn start(root: PathBuf, config: ScanConfig) -> Self {
        let (rx, handle) = Scanner::new(config).scan(root.clone());
        Self {
            root,
            progress: WalkProgress::default(),
            completed: false,
            rx,
            handle: Some(handle),
            disconnected: false,
        }
    }

    /// Drain pending messages without blocking
    fn poll(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(ScanMessage::Started(root)) => debug!(root = %root.display(), "scan started"),
                Ok(ScanMessage::Progress(progress)) => self.progress = progress,
                Ok(ScanMessage::Completed) => self.completed = true,
                Ok(ScanMessage::Failed(error)) => {
                    debug!(root = %self.root.display(), %error, "scan failed");
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }
    }

    fn finish(mut self) -> ScanOutcome {
        let joined = match self.handle.take() {
            Some(handle) => handle.join(),
            None => {
                return ScanOutcome::Failed {
                    root: self.root,
                    error: "scan already collected".to_string(),
                };
            }
        };

        match joined {
            Ok(Ok(report)) => ScanOutcome::Finished(report),
            Ok(Err(e)) => ScanOutcome::Failed {
                root: self.root,
                error: e.to_string(),
            },
            Err(_) => ScanOutcome::Failed {
                root: self.root,
                error: "scanner thread panicked".to_string(),
            },
        }
    }
}

/// All scans of one invocation
pub struct AppState {
    pub sessions: Vec<ScanSession>,
    pub spinner_frame: usize,
}

impl AppState {
    /// Start one background scan per path
    pub fn start(paths: &[PathBuf], config: &ScanConfig) -> Self {
        let sessions = paths
            .iter()
            .map(|path| ScanSession::start(path.clone(), config.clone()))
            .collect();

        Self {
            sessions,
            spinner_frame: 0,
        }
    }

    pub fn poll(&mut self) {
        for session in &mut self.sessions {
            session.poll();
        }
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn is_finished(&self) -> bool {
        self.sessions.iter().all(|s| s.disconnected)
    }

    /// Combined counters of every scan still running
    pub fn running_progress(&self) -> (usize, WalkProgress) {
        let mut running = 0;
        let mut total = WalkProgress::default();
        for session in self.sessions.iter().filter(|s| !s.completed) {
            running += 1;
            total.discovered_dirs += session.progress.discovered_dirs;
            total.completed_dirs += session.progress.completed_dirs;
            total.files_counted += session.progress.files_counted;
        }
        (running, total)
    }

    /// Join every scan, in argument order
    pub fn into_outcomes(self) -> Vec<ScanOutcome> {
        self.sessions.into_iter().map(ScanSession::finish).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_sessions_finish_in_argument_order() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();
        fs::write(a.join("x.rs"), "fn x() {}\n").unwrap();
        fs::write(b.join("y.rs"), "// y\n\n").unwrap();
        let missing = temp.path().join("missing");

        let paths = vec![b.clone(), missing.clone(), a.clone()];
        let mut state = AppState::start(&paths, &ScanConfig::default());
        while !state.is_finished() {
            state.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(state.sessions.iter().all(|s| s.completed));
        assert_eq!(state.running_progress().0, 0);

        let outcomes = state.into_outcomes();
        let roots: Vec<_> = outcomes
            .iter()
            .map(|o| match o {
                ScanOutcome::Finished(r) => r.root.clone(),
                ScanOutcome::Failed { root, .. } => root.clone(),
            })
            .collect();
        assert_eq!(roots, paths);
        assert!(outcomes.iter().all(|o| !o.is_failure()));

        match &outcomes[1] {
            ScanOutcome::Finished(report) => assert!(!report.is_found()),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
