mod directory;
mod lines;
mod progress;
mod walker;

pub use directory::{DirListing, MatchedFile, list_directory};
pub use lines::{COMMENT_PREFIXES, LineKind, classify_line, count_lines, count_reader};
pub use progress::{ScanMessage, WalkProgress};
pub use walker::{Scanner, WalkState, total_of};
