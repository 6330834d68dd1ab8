//! Error types raised while building the route table.
//!
//! Every error here is a startup error: once a [`RouteTable`](crate::RouteTable) exists,
//! resolution never fails, it only answers [`Resolution::NotFound`](crate::Resolution::NotFound).

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("file system error: {source}")]
    FileSystem {
        #[from]
        source: FileSystemError,
    },

    #[error("route load error: {source}")]
    RouteLoad {
        #[from]
        source: RouteLoadError,
    },
}

#[derive(Error, Debug)]
pub enum FileSystemError {
    #[error("can't read route directory {}: {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("can't inspect route entry {}: {source}", path.display())]
    Metadata { path: PathBuf, source: io::Error },

    #[error("route entry {} links back to its ancestor {}", path.display(), ancestor.display())]
    Loop { path: PathBuf, ancestor: PathBuf },
}

impl FileSystemError {
    pub fn read_dir<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Self::ReadDir { path: path.as_ref().to_path_buf(), source }
    }

    pub fn metadata<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Self::Metadata { path: path.as_ref().to_path_buf(), source }
    }
}

/// A failure at the root means the root itself can't be read, anything deeper
/// is reported against the entry the walk stopped at.
impl From<walkdir::Error> for FileSystemError {
    fn from(e: walkdir::Error) -> Self {
        let path = e.path().map(Path::to_path_buf).unwrap_or_default();
        if let Some(ancestor) = e.loop_ancestor() {
            return Self::Loop { ancestor: ancestor.to_path_buf(), path };
        }

        let depth = e.depth();
        let source = e.into_io_error().unwrap_or_else(|| io::Error::other("route directory walk failed"));
        if depth == 0 { Self::ReadDir { path, source } } else { Self::Metadata { path, source } }
    }
}

#[derive(Error, Debug)]
pub enum RouteLoadError {
    #[error("no route source registered for {}", path.display())]
    NotRegistered { path: PathBuf },

    #[error("route {} exports no handler for any method", path.display())]
    NoHandler { path: PathBuf },

    #[error("route definition has neither an explicit path nor a source file")]
    MissingPath,

    #[error("invalid route pattern for '{template}': {source}")]
    InvalidPattern { template: String, source: regex::Error },

    #[error("failed to load route {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl RouteLoadError {
    pub fn not_registered<P: AsRef<Path>>(path: P) -> Self {
        Self::NotRegistered { path: path.as_ref().to_path_buf() }
    }

    pub fn no_handler<P: AsRef<Path>>(path: P) -> Self {
        Self::NoHandler { path: path.as_ref().to_path_buf() }
    }

    pub fn invalid_pattern<S: ToString>(template: S, source: regex::Error) -> Self {
        Self::InvalidPattern { template: template.to_string(), source }
    }

    pub fn malformed<P: AsRef<Path>, S: ToString>(path: P, reason: S) -> Self {
        Self::Malformed { path: path.as_ref().to_path_buf(), reason: reason.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("route root directory must be set")]
    MissingRoot,
}
