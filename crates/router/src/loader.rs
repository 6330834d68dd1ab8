//! Loading route definitions for discovered files.
//!
//! Discovery only finds files; what a file *exports* comes from a [`RouteLoader`].
//! The loader is handed to the table builder explicitly, so building a table needs
//! no global module state:
//!
//! - [`RouteRegistry`]: definitions registered in code, keyed by the file's path
//!   below the route root
//! - [`loader_fn`]: any closure from [`RouteFile`] to [`RouteDefinition`]

use crate::discovery::RouteFile;
use crate::error::RouteLoadError;
use crate::route::RouteDefinition;
use std::collections::HashMap;
use std::fmt;

/// Resolves a discovered route file to the route definition it exports.
#[cfg_attr(test, mockall::automock)]
pub trait RouteLoader {
    fn load(&self, file: &RouteFile) -> Result<RouteDefinition, RouteLoadError>;
}

/// Route definitions registered in code.
///
/// A definition is registered under the file's forward-slash path relative to the route
/// root, either with its extension (`users/[id].ts`) or without it (`users/[id]`).
/// The exact name is looked up first.
#[derive(Default)]
pub struct RouteRegistry {
    definitions: HashMap<String, RouteDefinition>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, relative_path: impl AsRef<str>, definition: RouteDefinition) -> Self {
        let key = relative_path.as_ref().trim_start_matches('/').replace('\\', "/");
        self.definitions.insert(key, definition);
        self
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl RouteLoader for RouteRegistry {
    fn load(&self, file: &RouteFile) -> Result<RouteDefinition, RouteLoadError> {
        let relative = file.relative();
        let without_extension = file.route_path();

        self.definitions
            .get(relative)
            .or_else(|| self.definitions.get(without_extension.trim_start_matches('/')))
            .cloned()
            .ok_or_else(|| RouteLoadError::not_registered(file.path()))
    }
}

impl fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.definitions.keys().collect::<Vec<_>>();
        keys.sort_unstable();
        f.debug_struct("RouteRegistry").field("definitions", &keys).finish()
    }
}

/// A loader that wraps a closure.
pub struct FnLoader<F>(F);

impl<F> RouteLoader for FnLoader<F>
where
    F: Fn(&RouteFile) -> Result<RouteDefinition, RouteLoadError>,
{
    fn load(&self, file: &RouteFile) -> Result<RouteDefinition, RouteLoadError> {
        (self.0)(file)
    }
}

impl<F> fmt::Debug for FnLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnLoader")
    }
}

/// Creates a loader from a closure.
///
/// # Example
/// ```
/// use micro_fs_router::{loader_fn, RouteLoadError};
///
/// let loader = loader_fn(|file| Err(RouteLoadError::not_registered(file.path())));
/// ```
pub fn loader_fn<F>(f: F) -> FnLoader<F>
where
    F: Fn(&RouteFile) -> Result<RouteDefinition, RouteLoadError>,
{
    FnLoader(f)
}
