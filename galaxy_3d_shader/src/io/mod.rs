//! File access module
//!
//! Named byte streams and the providers that resolve logical names to them.

mod file;
mod memory_file_system;
mod directory_file_system;

pub use file::{FileStream, FileProvider, parent_path};
pub use memory_file_system::MemoryFileSystem;
pub use directory_file_system::DirectoryFileSystem;
