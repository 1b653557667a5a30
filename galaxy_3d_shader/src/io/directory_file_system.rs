/// File provider reading from a directory on disk.

use std::path::{Path, PathBuf};
use crate::error::{Error, Result};
use crate::io::{FileProvider, FileStream};

pub struct DirectoryFileSystem {
    root: PathBuf,
}

impl DirectoryFileSystem {
    /// Mount `root`; logical names resolve relative to it
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Mounted root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for a logical name
    pub fn resolve(&self, name: &str) -> PathBuf {
        name.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

impl FileProvider for DirectoryFileSystem {
    fn open(&self, name: &str) -> Result<FileStream> {
        let path = self.resolve(name);
        if !path.is_file() {
            return Err(Error::FileNotFound(name.to_string()));
        }

        std::fs::read(&path)
            .map(|data| FileStream::new(name, data))
            .map_err(|e| Error::InvalidSource {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_file()
    }
}
