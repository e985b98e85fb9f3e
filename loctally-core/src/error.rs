use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scan worker panicked")]
    WorkerPanicked,
}

impl LocError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LocError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LocError>;
