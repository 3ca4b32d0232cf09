// ABOUTME: Error types for site-wide operations: discovery, reading, writing and rendering.
// ABOUTME: Provides SiteError with Io, MissingRoot and Render variants.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while processing a site tree.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Reading or writing a file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configured site root does not exist or is not a directory.
    #[error("site root not found: {}", .0.display())]
    MissingRoot(PathBuf),

    /// Serializing a report failed.
    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

impl SiteError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        SiteError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns true if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, SiteError::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
