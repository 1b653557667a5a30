/// In-memory file provider.
///
/// Files can be inserted or replaced at any time through a shared reference,
/// which is how tools push edited sources before asking the resource cache
/// to reload dependents.

use std::sync::RwLock;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::io::{FileProvider, FileStream};

pub struct MemoryFileSystem {
    files: RwLock<FxHashMap<String, Vec<u8>>>,
}

impl MemoryFileSystem {
    /// Create an empty file system
    pub fn new() -> Self {
        Self {
            files: RwLock::new(FxHashMap::default()),
        }
    }

    /// Build a file system from `(name, text)` pairs
    pub fn from_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let fs = Self::new();
        for (name, text) in files {
            fs.insert_text(name, text);
        }
        fs
    }

    /// Insert or replace a file
    pub fn insert(&self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        if let Ok(mut files) = self.files.write() {
            files.insert(name.into(), data.into());
        }
    }

    /// Insert or replace a text file
    pub fn insert_text(&self, name: impl Into<String>, text: &str) {
        self.insert(name, text.as_bytes().to_vec());
    }

    /// Remove a file, returning whether it existed
    pub fn remove(&self, name: &str) -> bool {
        self.files.write().map(|mut files| files.remove(name).is_some()).unwrap_or(false)
    }

    /// Number of stored files
    pub fn file_count(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or(0)
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileProvider for MemoryFileSystem {
    fn open(&self, name: &str) -> Result<FileStream> {
        let files = self.files.read()
            .map_err(|_| Error::InvalidResource("MemoryFileSystem lock poisoned".to_string()))?;

        files.get(name)
            .map(|data| FileStream::new(name, data.clone()))
            .ok_or_else(|| Error::FileNotFound(name.to_string()))
    }

    fn exists(&self, name: &str) -> bool {
        self.files.read().map(|files| files.contains_key(name)).unwrap_or(false)
    }
}
