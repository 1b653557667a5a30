/// Graphics trait and shader compile descriptor
///
/// The shader system never compiles anything itself: it hands stage source
/// text to an implementation of [`Graphics`] (Vulkan, D3D, GL backend...).

use std::fmt;
use std::sync::Arc;
use crate::error::Result;

/// Shader pipeline stage handled by the shader system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Pixel (fragment) shader
    Pixel,
}

impl ShaderStage {
    /// Both stages, vertex first
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Pixel];
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "VS"),
            ShaderStage::Pixel => write!(f, "PS"),
        }
    }
}

/// Descriptor for compiling one shader variation
#[derive(Debug, Clone)]
pub struct ShaderDesc<'a> {
    /// Variation display name (for diagnostics)
    pub name: &'a str,
    /// Shader stage
    pub stage: ShaderStage,
    /// Stage source text (already include-resolved and stage-split)
    pub source: &'a str,
    /// Entry point function name
    pub entry_point: &'a str,
    /// Preprocessor defines, one token each (`NAME` or `NAME=VALUE`)
    pub defines: Vec<&'a str>,
}

/// Compiled GPU program for one variation
///
/// Implemented by backend-specific shader objects.
/// The GPU object is destroyed when the last reference is dropped.
pub trait GpuShader: Send + Sync {}

/// Graphics subsystem consumed by the shader system
pub trait Graphics: Send + Sync {
    /// Whether a rendering context is active (loads are refused otherwise)
    fn is_available(&self) -> bool;

    /// Compile one shader variation
    ///
    /// # Errors
    ///
    /// Returns `Error::ShaderCompileFailed` carrying the compiler output.
    fn compile_shader(&self, desc: &ShaderDesc) -> Result<Arc<dyn GpuShader>>;
}
