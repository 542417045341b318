//! Store location settings.

use std::path::{Path, PathBuf};

/// Where extent files are written and read.
///
/// Each kind lives in `<dir>/<kind>.<extension>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one file per kind.
    pub dir: PathBuf,
    /// File extension, without the dot.
    pub extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            extension: "msgpack".to_string(),
        }
    }
}

impl StoreConfig {
    /// Creates the default config rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::default().with_dir(dir)
    }

    /// Sets the directory.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets the file extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Returns the directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file for one kind.
    #[must_use]
    pub fn path_for(&self, kind: &str) -> PathBuf {
        self.dir.join(format!("{kind}.{}", self.extension))
    }
}
