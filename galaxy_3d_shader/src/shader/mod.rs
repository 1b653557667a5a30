//! Shader source preprocessing
//!
//! Turns one combined shader file into per-stage source text and keeps the
//! per-stage caches of define-specialized variations:
//!
//! - **defines**: canonical form + hash of a free-form define string
//! - **include_resolver**: recursive `#include` flattening with dependency tracking
//! - **stage_splitter**: derive vertex-only / pixel-only text from the combined file
//! - **variation_cache**: one variation object per (stage, canonical defines)

mod defines;
mod include_resolver;
mod stage_splitter;
mod variation_cache;

pub use defines::{canonicalize_defines, split_defines, DefinesHash};
pub use include_resolver::{IncludeResolver, parse_include_directive, DEFAULT_MAX_INCLUDE_DEPTH};
pub use stage_splitter::{ShaderDialect, StageSources, split_stages};
pub use variation_cache::{VariationCache, variation_name};

/// Build-time shader preprocessing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderConfig {
    /// How stage entry points are exposed in the derived stage sources
    pub dialect: ShaderDialect,
    /// Maximum include nesting before loading fails
    pub max_include_depth: usize,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            dialect: ShaderDialect::default(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}
