use std::path::{Path, PathBuf};

use shipgate_core::VersionRecord;

use crate::Result;
use crate::traits::LocalVersionSource;

/// Reads the declared version from a `Cargo.toml` or `package.json`.
pub struct FileSystemVersionSource {
    path: PathBuf,
}

impl FileSystemVersionSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalVersionSource for FileSystemVersionSource {
    fn read_local(&self) -> Result<VersionRecord> {
        Ok(shipgate_manifest::read_local_version(&self.path)?)
    }
}
