use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal errors. Any of these aborts the run before output is written.
#[derive(Debug, Error)]
pub enum SlcspError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed row, missing column, or non-numeric rate
    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl SlcspError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SlcspError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        SlcspError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SlcspError::Io { path, .. } | SlcspError::Csv { path, .. } => path,
        }
    }
}
