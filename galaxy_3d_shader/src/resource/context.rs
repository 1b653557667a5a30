/// Subsystems a resource is created with.
///
/// Each collaborator is optional; resources decide which ones they require
/// and fail their load with `Error::MissingSubsystem` when one is absent.

use std::sync::Arc;
use crate::graphics::Graphics;
use crate::io::FileProvider;
use crate::resource::ResourceId;
use crate::shader::ShaderConfig;

/// Records "owner must reload when this file changes" edges
pub trait DependencyTracker: Send + Sync {
    /// Register `file` as a dependency of `owner` (repeat registrations are harmless)
    fn register_dependency(&self, owner: ResourceId, file: &str);

    /// Forget every dependency of `owner`
    fn clear_dependencies(&self, owner: ResourceId);
}

/// Receives memory footprint updates
pub trait MemoryTracker: Send + Sync {
    /// Report the current footprint of `resource`
    fn report(&self, resource: ResourceId, bytes: u64);
}

/// Collaborators and configuration shared by resources
#[derive(Clone, Default)]
pub struct Context {
    graphics: Option<Arc<dyn Graphics>>,
    file_provider: Option<Arc<dyn FileProvider>>,
    dependency_tracker: Option<Arc<dyn DependencyTracker>>,
    memory_tracker: Option<Arc<dyn MemoryTracker>>,
    shader_config: ShaderConfig,
}

impl Context {
    /// Create a context with no subsystems and the default shader config
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graphics(mut self, graphics: Arc<dyn Graphics>) -> Self {
        self.graphics = Some(graphics);
        self
    }

    pub fn with_file_provider(mut self, file_provider: Arc<dyn FileProvider>) -> Self {
        self.file_provider = Some(file_provider);
        self
    }

    pub fn with_dependency_tracker(mut self, tracker: Arc<dyn DependencyTracker>) -> Self {
        self.dependency_tracker = Some(tracker);
        self
    }

    pub fn with_memory_tracker(mut self, tracker: Arc<dyn MemoryTracker>) -> Self {
        self.memory_tracker = Some(tracker);
        self
    }

    pub fn with_shader_config(mut self, config: ShaderConfig) -> Self {
        self.shader_config = config;
        self
    }

    pub fn graphics(&self) -> Option<&dyn Graphics> {
        self.graphics.as_deref()
    }

    pub fn file_provider(&self) -> Option<&dyn FileProvider> {
        self.file_provider.as_deref()
    }

    pub fn dependency_tracker(&self) -> Option<&dyn DependencyTracker> {
        self.dependency_tracker.as_deref()
    }

    pub fn memory_tracker(&self) -> Option<&dyn MemoryTracker> {
        self.memory_tracker.as_deref()
    }

    pub fn shader_config(&self) -> &ShaderConfig {
        &self.shader_config
    }
}
