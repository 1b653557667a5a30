/// Named byte streams and the file provider interface.
///
/// Logical names are `/`-separated and relative to whatever root the
/// provider mounts (e.g. `Shaders/Basic.glsl`).

use crate::error::{Error, Result};

/// A fully-read byte stream with a logical name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStream {
    name: String,
    data: Vec<u8>,
}

impl FileStream {
    /// Create a stream from raw bytes
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Create a stream from text
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, text.as_bytes().to_vec())
    }

    /// Logical name the stream was opened under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the stream holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stream contents as UTF-8 text
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSource` if the bytes are not valid UTF-8.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.data).map_err(|e| Error::InvalidSource {
            name: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

/// Resolves logical names to readable streams
pub trait FileProvider: Send + Sync {
    /// Open a file by logical name
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound` if no such file exists.
    fn open(&self, name: &str) -> Result<FileStream>;

    /// Whether a file with this logical name exists
    fn exists(&self, name: &str) -> bool;
}

/// Directory part of a logical name, including the trailing `/`
///
/// Returns an empty string for names without a directory.
pub fn parent_path(name: &str) -> &str {
    match name.rfind('/') {
        Some(pos) => &name[..=pos],
        None => "",
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
