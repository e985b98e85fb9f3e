use std::time::Duration;

use crate::filter::ExtensionFilter;

/// Default bound on queued-but-not-started jobs before work runs inline
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Default cadence of progress snapshots
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Which files are counted
    pub extensions: ExtensionFilter,
    /// Collect one bucket per matched extension
    pub per_extension: bool,
    /// Collect stats for every counted file
    pub per_file: bool,
    /// Number of worker threads (0 = auto)
    pub num_threads: usize,
    /// Capacity of the job queue
    pub queue_capacity: usize,
    /// How often the progress monitor samples the walker
    pub poll_interval: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: ExtensionFilter::default(),
            per_extension: false,
            per_file: false,
            num_threads: 0, // auto
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ScanConfig {
    /// Worker count after resolving `0` to the machine's parallelism
    pub fn worker_count(&self) -> usize {
        if self.num_threads > 0 {
            self.num_threads
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count() {
        let config = ScanConfig {
            num_threads: 3,
            ..ScanConfig::default()
        };
        assert_eq!(config.worker_count(), 3);
        assert!(ScanConfig::default().worker_count() >= 1);
    }
}
