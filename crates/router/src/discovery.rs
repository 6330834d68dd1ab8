//! Route discovery: walks the route root and collects route source files.
//!
//! Within one directory, matching files come first in directory-listing order,
//! followed by the contents of its subdirectories in listing order. The order
//! only serves as the tie-break between routes of equal priority.

use crate::config::normalize_extension;
use crate::error::FileSystemError;
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::trace;
use walkdir::{DirEntry, WalkDir};

/// Recursively collects every file under `root` whose extension is one of `extensions`.
///
/// Extensions are compared case-sensitively, with or without their leading dot.
/// Symlinks are followed. Fails if `root` is not a readable directory, or if any
/// entry below it can't be read or links back to one of its ancestors.
pub fn discover<P, S>(root: P, extensions: &[S]) -> Result<Vec<PathBuf>, FileSystemError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let root = root.as_ref();
    let extensions = extensions.iter().map(|ext| normalize_extension(ext.as_ref())).collect::<Vec<_>>();

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by(files_first) {
        let entry = entry?;
        let file_type = entry.file_type();

        if entry.depth() == 0 && !file_type.is_dir() {
            return Err(FileSystemError::read_dir(root, io::Error::from(io::ErrorKind::NotADirectory)));
        }
        if file_type.is_file() && has_extension(entry.path(), &extensions) {
            trace!(file = %entry.path().display(), "found route source");
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

// stable, so each group keeps listing order
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    sorts_as_dir(a).cmp(&sorts_as_dir(b))
}

// entries are listed before their links are followed
fn sorts_as_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension().and_then(OsStr::to_str).is_some_and(|ext| extensions.contains(&ext))
}

/// A discovered route source file, located relative to the route root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFile {
    path: PathBuf,
    relative: String,
}

impl RouteFile {
    /// Locates `path` below `root`. A path outside of `root` keeps its own components.
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let relative_path = path.strip_prefix(root).unwrap_or(&path);
        let relative = relative_path
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        Self { path, relative }
    }

    /// The path as discovered on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forward-slash path relative to the route root, extension included, e.g. `users/[id].ts`
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// The route template this file answers when its definition declares no path,
    /// e.g. `users/[id].ts` becomes `/users/[id]`.
    pub fn route_path(&self) -> String {
        let without_extension = match self.relative.rsplit_once('/') {
            Some((dir, file)) => format!("{dir}/{}", strip_file_extension(file)),
            None => strip_file_extension(&self.relative).to_owned(),
        };
        format!("/{without_extension}")
    }
}

fn strip_file_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
