use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{LocError, Result};
use crate::filter::ExtensionFilter;

/// A file that matched the extension filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub path: PathBuf,
    /// The filter pattern that matched
    pub extension: String,
}

/// Immediate contents of one directory
#[derive(Debug, Default)]
pub struct DirListing {
    pub subdirs: Vec<PathBuf>,
    pub files: Vec<MatchedFile>,
}

/// List one directory level. Entries are stat'ed through symlinks; anything
/// that is neither a directory nor a regular file is skipped, as are files no
/// pattern matches.
pub fn list_directory(path: &Path, filter: &ExtensionFilter) -> Result<DirListing> {
    let mut listing = DirListing::default();

    for entry in fs::read_dir(path).map_err(|e| LocError::io(path, e))? {
        let entry = entry.map_err(|e| LocError::io(path, e))?;
        let child = entry.path();
        let metadata = fs::metadata(&child).map_err(|e| LocError::io(&child, e))?;

        if metadata.is_dir() {
            listing.subdirs.push(child);
        } else if metadata.is_file() {
            match filter.matches(&child) {
                Some(extension) => {
                    let extension = extension.to_string();
                    listing.files.push(MatchedFile {
                        path: child,
                        extension,
                    });
                }
                None => trace!(path = %child.display(), "skipping unmatched file"),
            }
        }
    }

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_directory_splits_dirs_and_matches() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.rs"), "fn main() {}").unwrap();
        fs::write(temp.path().join("logo.png"), "png").unwrap();
        fs::write(temp.path().join("Makefile"), "all:").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/inner.rs"), "").unwrap();

        let filter = ExtensionFilter::new([".rs", "Makefile"]);
        let listing = list_directory(temp.path(), &filter).unwrap();

        assert_eq!(listing.subdirs, vec![temp.path().join("sub")]);

        let mut files = listing.files;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            files,
            vec![
                MatchedFile {
                    path: temp.path().join("Makefile"),
                    extension: "Makefile".to_string(),
                },
                MatchedFile {
                    path: temp.path().join("main.rs"),
                    extension: ".rs".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_list_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = list_directory(&temp.path().join("gone"), &ExtensionFilter::default());
        assert!(matches!(err, Err(LocError::Io { .. })));
    }
}
