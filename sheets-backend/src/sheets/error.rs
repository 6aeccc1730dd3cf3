//! Error taxonomy shared by the sheet stores, the pattern store and search.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SheetError>;

#[derive(Debug, Error)]
pub enum SheetError {
    /// No record for the key, neither cached nor on disk.
    #[error("sheet does not exist: {0}")]
    NotFound(String),

    #[error("sheet already exists: {0}")]
    AlreadyExists(String),

    /// A key, date string or filename that does not fit the grammar.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Empty or malformed reminder pattern, or a search regex that fails to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SheetError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        SheetError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SheetError::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, SheetError::AlreadyExists(_))
    }

    /// HTTP status a presentation layer should use when rendering this error.
    pub fn status_code(&self) -> u16 {
        match self {
            SheetError::NotFound(_) => 404,
            SheetError::AlreadyExists(_) => 409,
            SheetError::InvalidFormat(_) | SheetError::InvalidPattern(_) => 400,
            SheetError::Io { .. } => 500,
        }
    }
}
