/// One define-specialized, stage-specific compiled shader.
///
/// Variations are created on demand by their owning [`Shader`](crate::resource::Shader)
/// and shared through `Arc`. They only keep the owner's id and name, never a
/// reference to the owner itself, so a variation handle stays valid (but
/// uncompilable) after its shader is gone.

use std::fmt;
use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use crate::graphics::{GpuShader, Graphics, ShaderDesc, ShaderStage};
use crate::resource::ResourceId;
use crate::shader::{split_defines, ShaderDialect};

/// Compile state of a variation
#[derive(Clone)]
pub enum VariationState {
    /// Created, never compiled
    Pending,
    /// GPU object available
    Compiled(Arc<dyn GpuShader>),
    /// Last compile failed; not retried until released
    Failed(String),
    /// GPU object discarded by a reload; recompiles on next use
    Released,
}

impl fmt::Debug for VariationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariationState::Pending => write!(f, "Pending"),
            VariationState::Compiled(_) => write!(f, "Compiled"),
            VariationState::Failed(output) => write!(f, "Failed({:?})", output),
            VariationState::Released => write!(f, "Released"),
        }
    }
}

pub struct ShaderVariation {
    owner: ResourceId,
    name: String,
    stage: ShaderStage,
    defines: String,
    state: Mutex<VariationState>,
}

impl ShaderVariation {
    /// Create a pending variation
    ///
    /// `defines` must already be canonical.
    pub fn new(owner: ResourceId, name: impl Into<String>, stage: ShaderStage, defines: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
            stage,
            defines: defines.into(),
            state: Mutex::new(VariationState::Pending),
        }
    }

    // ===== ACCESSORS =====

    /// Display name (`<path><file stem>_<defines with '_'>`)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Canonical define string
    pub fn defines(&self) -> &str {
        &self.defines
    }

    /// Id of the owning shader resource
    pub fn owner(&self) -> ResourceId {
        self.owner
    }

    /// Snapshot of the compile state
    ///
    /// A poisoned state lock is logged and reported as `Released`.
    pub fn state(&self) -> VariationState {
        match self.state.lock() {
            Ok(state) => state.clone(),
            Err(_) => {
                crate::engine_warn!("galaxy3d::ShaderVariation",
                    "ShaderVariation '{}' lock poisoned, reporting it released", self.name);
                VariationState::Released
            }
        }
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self.state(), VariationState::Compiled(_))
    }

    pub fn is_released(&self) -> bool {
        matches!(self.state(), VariationState::Released)
    }

    /// Whether the next `compile` call will invoke the compiler
    pub fn needs_compile(&self) -> bool {
        matches!(self.state(), VariationState::Pending | VariationState::Released)
    }

    /// Compiler output of the last failed compile
    pub fn compiler_output(&self) -> Option<String> {
        match self.state() {
            VariationState::Failed(output) => Some(output),
            _ => None,
        }
    }

    /// Compiled GPU object, if any
    pub fn gpu_shader(&self) -> Option<Arc<dyn GpuShader>> {
        match self.state() {
            VariationState::Compiled(gpu) => Some(gpu),
            _ => None,
        }
    }

    // ===== LIFECYCLE =====

    /// Compile from `source` unless already compiled
    ///
    /// A variation whose previous compile failed is not recompiled until it
    /// has been released.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShaderCompileFailed` with the compiler output.
    pub fn compile(&self, graphics: &dyn Graphics, source: &str, dialect: ShaderDialect) -> Result<Arc<dyn GpuShader>> {
        let mut state = self.state.lock()
            .map_err(|_| crate::engine_err!("galaxy3d::ShaderVariation",
                Error::InvalidResource(format!("ShaderVariation '{}' lock poisoned", self.name))))?;

        match &*state {
            VariationState::Compiled(gpu) => return Ok(Arc::clone(gpu)),
            VariationState::Failed(output) => {
                return Err(Error::ShaderCompileFailed {
                    name: self.name.clone(),
                    output: output.clone(),
                });
            }
            VariationState::Pending | VariationState::Released => {}
        }

        let desc = ShaderDesc {
            name: &self.name,
            stage: self.stage,
            source,
            entry_point: dialect.entry_point(self.stage),
            defines: split_defines(&self.defines).collect(),
        };

        match graphics.compile_shader(&desc) {
            Ok(gpu) => {
                crate::engine_debug!("galaxy3d::ShaderVariation",
                    "Compiled {} variation '{}'", self.stage, self.name);
                *state = VariationState::Compiled(Arc::clone(&gpu));
                Ok(gpu)
            }
            Err(err) => {
                let output = match &err {
                    Error::ShaderCompileFailed { output, .. } => output.clone(),
                    other => other.to_string(),
                };
                *state = VariationState::Failed(output.clone());
                Err(crate::engine_err!("galaxy3d::ShaderVariation", Error::ShaderCompileFailed {
                    name: self.name.clone(),
                    output,
                }))
            }
        }
    }

    /// Discard the GPU object (and any compile failure)
    pub fn release(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = VariationState::Released;
        }
    }
}

impl fmt::Debug for ShaderVariation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderVariation")
            .field("name", &self.name)
            .field("stage", &self.stage)
            .field("defines", &self.defines)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
#[path = "shader_variation_tests.rs"]
mod tests;
