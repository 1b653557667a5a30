//! Error types for the Galaxy3D shader system
//!
//! This module defines the error types used throughout the crate,
//! including shader loading, include resolution, and resource management.

use std::fmt;

/// Result type for Galaxy3D shader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D shader errors
#[derive(Debug, Clone)]
pub enum Error {
    /// No active rendering context at load time
    GraphicsUnavailable,

    /// A referenced include file could not be opened
    IncludeNotFound {
        /// Resolved name of the include that failed
        include: String,
        /// Logical name of the file containing the directive
        from: String,
    },

    /// Include nesting went deeper than the configured limit (usually a cycle)
    IncludeDepthExceeded {
        /// Include that would have exceeded the limit
        include: String,
        /// Configured depth limit
        depth: usize,
    },

    /// A required collaborator subsystem is absent (file provider, dependency tracker...)
    MissingSubsystem(String),

    /// A file could not be found by the file provider
    FileNotFound(String),

    /// Source bytes could not be interpreted as text
    InvalidSource {
        /// Logical name of the stream
        name: String,
        /// Why decoding failed
        reason: String,
    },

    /// The graphics collaborator rejected a shader variation
    ShaderCompileFailed {
        /// Variation name
        name: String,
        /// Compiler output
        output: String,
    },

    /// No factory registered for a resource type
    UnknownResourceType(String),

    /// Invalid resource (unknown id, wrong type...)
    InvalidResource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::GraphicsUnavailable => write!(f, "Graphics subsystem unavailable"),
            Error::IncludeNotFound { include, from } => {
                write!(f, "Include file '{}' not found (included from '{}')", include, from)
            }
            Error::IncludeDepthExceeded { include, depth } => {
                write!(f, "Include depth limit {} exceeded while including '{}'", depth, include)
            }
            Error::MissingSubsystem(name) => write!(f, "Missing subsystem: {}", name),
            Error::FileNotFound(name) => write!(f, "File not found: {}", name),
            Error::InvalidSource { name, reason } => {
                write!(f, "Invalid source '{}': {}", name, reason)
            }
            Error::ShaderCompileFailed { name, output } => {
                write!(f, "Failed to compile shader '{}': {}", name, output)
            }
            Error::UnknownResourceType(type_name) => {
                write!(f, "Unknown resource type: {}", type_name)
            }
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error (with file:line) and evaluate to it
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_shader::{engine_err, galaxy3d::Error};
/// let err = engine_err!("galaxy3d::Shader", Error::GraphicsUnavailable);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $error:expr) => {{
        let error: $crate::galaxy3d::Error = $error;
        $crate::engine_error!($source, "{}", error);
        error
    }};
}

/// Log an error (with file:line) and return it from the current function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $error:expr) => {
        return Err($crate::engine_err!($source, $error))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
