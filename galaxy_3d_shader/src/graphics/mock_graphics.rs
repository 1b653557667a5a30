/// Mock graphics backend for unit tests (no GPU required)
///
/// Records every compile request and can be switched unavailable or told to
/// reject sources containing a marker string.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use crate::error::{Error, Result};
use crate::graphics::{Graphics, GpuShader, ShaderDesc, ShaderStage};

// ============================================================================
// Mock Shader
// ============================================================================

#[derive(Debug)]
pub struct MockGpuShader {
    pub name: String,
    pub stage: ShaderStage,
    pub entry_point: String,
}

impl GpuShader for MockGpuShader {}

// ============================================================================
// Mock Graphics
// ============================================================================

/// One recorded compile call
#[derive(Debug, Clone)]
pub struct CompileRecord {
    pub name: String,
    pub stage: ShaderStage,
    pub entry_point: String,
    pub defines: Vec<String>,
}

pub struct MockGraphics {
    available: AtomicBool,
    fail_marker: Mutex<Option<String>>,
    compiles: Mutex<Vec<CompileRecord>>,
}

impl MockGraphics {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            fail_marker: Mutex::new(None),
            compiles: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        let graphics = Self::new();
        graphics.set_available(false);
        graphics
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make every compile whose source contains `marker` fail
    pub fn fail_when_source_contains(&self, marker: &str) {
        *self.fail_marker.lock().unwrap() = Some(marker.to_string());
    }

    pub fn compile_count(&self) -> usize {
        self.compiles.lock().unwrap().len()
    }

    pub fn compiles(&self) -> Vec<CompileRecord> {
        self.compiles.lock().unwrap().clone()
    }
}

impl Graphics for MockGraphics {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn compile_shader(&self, desc: &ShaderDesc) -> Result<Arc<dyn GpuShader>> {
        self.compiles.lock().unwrap().push(CompileRecord {
            name: desc.name.to_string(),
            stage: desc.stage,
            entry_point: desc.entry_point.to_string(),
            defines: desc.defines.iter().map(|d| d.to_string()).collect(),
        });

        if let Some(marker) = self.fail_marker.lock().unwrap().as_deref() {
            if desc.source.contains(marker) {
                return Err(Error::ShaderCompileFailed {
                    name: desc.name.to_string(),
                    output: format!("mock compiler rejected '{}'", marker),
                });
            }
        }

        Ok(Arc::new(MockGpuShader {
            name: desc.name.to_string(),
            stage: desc.stage,
            entry_point: desc.entry_point.to_string(),
        }))
    }
}
