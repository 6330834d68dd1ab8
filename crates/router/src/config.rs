//! Router start-up configuration.
//!
//! A [`RouterConfig`] names the directory that holds route sources and the file
//! extensions that count as route sources. It can be built in code or deserialized
//! from a host application's configuration:
//!
//! ```
//! use micro_fs_router::RouterConfig;
//!
//! let config = RouterConfig::builder().root("routes").extensions([".rs"]).build().unwrap();
//! assert_eq!(config.extensions(), ["rs"]);
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Extensions recognized when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["js", "ts"];

#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    root: PathBuf,
    #[serde(default = "default_extensions")]
    extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect()
}

/// strips the leading dot so `.ts` and `ts` name the same extension
pub(crate) fn normalize_extension(ext: &str) -> &str {
    ext.strip_prefix('.').unwrap_or(ext)
}

impl RouterConfig {
    /// Creates a config for `root` with the [`DEFAULT_EXTENSIONS`]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), extensions: default_extensions() }
    }

    pub fn builder() -> RouterConfigBuilder {
        RouterConfigBuilder::new()
    }

    /// The directory scanned for route sources
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allowed extensions, compared case-sensitively against file names
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

#[derive(Debug, Default)]
pub struct RouterConfigBuilder {
    root: Option<PathBuf>,
    extensions: Option<Vec<String>>,
}

impl RouterConfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions.into_iter().map(|ext| normalize_extension(ext.as_ref()).to_owned()).collect();
        self.extensions = Some(extensions);
        self
    }

    pub fn build(self) -> Result<RouterConfig, ConfigError> {
        let root = self.root.ok_or(ConfigError::MissingRoot)?;
        let extensions = self.extensions.unwrap_or_else(default_extensions);
        Ok(RouterConfig { root, extensions })
    }
}
