pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod report;
pub mod scanner;

pub use config::ScanConfig;
pub use error::{LocError, Result};
pub use filter::{DEFAULT_EXTENSIONS, ExtensionFilter};
pub use format::{format_count, percentage};
pub use report::{ExtensionBucket, LineStats, Report, ScanStatus};
pub use scanner::{ScanMessage, Scanner, WalkProgress, WalkState, total_of};
