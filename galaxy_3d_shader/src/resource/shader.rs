/// Shader resource: one combined source file split into vertex and pixel
/// stages, plus the per-stage caches of define-specialized variations.
///
/// Loading flattens `#include`s, derives both stage sources and releases (but
/// keeps) every existing variation so callers holding handles see them go
/// stale instead of dangling. Compilation is deferred until a variation is
/// prepared.

use std::mem::size_of;
use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use crate::graphics::ShaderStage;
use crate::io::FileStream;
use crate::resource::{Context, Resource, ResourceCache, ResourceId, ShaderVariation, SharedResource};
use crate::shader::{canonicalize_defines, split_stages, IncludeResolver, StageSources, VariationCache};

pub struct Shader {
    id: ResourceId,
    name: String,
    context: Arc<Context>,
    sources: StageSources,
    vs_variations: VariationCache,
    ps_variations: VariationCache,
    memory_use: u64,
}

impl Shader {
    /// Type tag the shader factory is registered under
    pub const TYPE_NAME: &'static str = "Shader";

    /// Create an unloaded shader
    pub fn new(id: ResourceId, name: impl Into<String>, context: Arc<Context>) -> Self {
        Self {
            id,
            name: name.into(),
            context,
            sources: StageSources::default(),
            vs_variations: VariationCache::new(ShaderStage::Vertex),
            ps_variations: VariationCache::new(ShaderStage::Pixel),
            memory_use: size_of::<Shader>() as u64,
        }
    }

    /// Register the shader factory with `cache`
    pub fn register_object(cache: &ResourceCache) {
        cache.register_factory(Self::TYPE_NAME, |id, name, context| {
            let shader: SharedResource = Arc::new(Mutex::new(Shader::new(id, name, context)));
            shader
        });
    }

    // ===== SOURCES =====

    /// Vertex stage source of the last successful load
    pub fn vertex_source(&self) -> &str {
        &self.sources.vertex
    }

    /// Pixel stage source of the last successful load
    pub fn pixel_source(&self) -> &str {
        &self.sources.pixel
    }

    pub fn source(&self, stage: ShaderStage) -> &str {
        self.sources.get(stage)
    }

    // ===== VARIATIONS =====

    /// Get or create the variation of `stage` for `defines`
    ///
    /// `defines` is canonicalized first, so `" A   B "` and `"A B"` return the
    /// same handle. Creating a variation does not compile it.
    pub fn get_variation(&mut self, stage: ShaderStage, defines: &str) -> Arc<ShaderVariation> {
        let canonical = canonicalize_defines(defines);

        let cache = match stage {
            ShaderStage::Vertex => &mut self.vs_variations,
            ShaderStage::Pixel => &mut self.ps_variations,
        };
        let (variation, created) = cache.get_or_create(self.id, &self.name, &canonical);

        if created {
            crate::engine_trace!("galaxy3d::Shader",
                "Created {} variation '{}'", stage, variation.name());
            self.memory_use += size_of::<ShaderVariation>() as u64;
            self.report_memory_use();
        }

        variation
    }

    /// Get or create a variation and compile it if needed
    ///
    /// # Errors
    ///
    /// - `Error::GraphicsUnavailable` if no active graphics subsystem
    /// - `Error::ShaderCompileFailed` if the compiler rejects the stage source
    pub fn prepare_variation(&mut self, stage: ShaderStage, defines: &str) -> Result<Arc<ShaderVariation>> {
        let variation = self.get_variation(stage, defines);

        if variation.is_compiled() {
            return Ok(variation);
        }

        let context = Arc::clone(&self.context);
        let graphics = match context.graphics() {
            Some(graphics) if graphics.is_available() => graphics,
            _ => crate::engine_bail!("galaxy3d::Shader", Error::GraphicsUnavailable),
        };

        variation.compile(graphics, self.sources.get(stage), context.shader_config().dialect)?;
        Ok(variation)
    }

    /// Cached variations of `stage`
    pub fn variations(&self, stage: ShaderStage) -> &VariationCache {
        match stage {
            ShaderStage::Vertex => &self.vs_variations,
            ShaderStage::Pixel => &self.ps_variations,
        }
    }

    /// Total number of variations over both stages
    pub fn variation_count(&self) -> usize {
        ShaderStage::ALL.iter().map(|&stage| self.variations(stage).len()).sum()
    }

    // ===== MEMORY =====

    fn refresh_memory_use(&mut self) {
        self.memory_use = size_of::<Shader>() as u64
            + self.sources.total_len() as u64
            + (self.variation_count() * size_of::<ShaderVariation>()) as u64;
        self.report_memory_use();
    }

    fn report_memory_use(&self) {
        if let Some(tracker) = self.context.memory_tracker() {
            tracker.report(self.id, self.memory_use);
        }
    }
}

impl Resource for Shader {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn id(&self) -> ResourceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn load(&mut self, source: &FileStream) -> Result<()> {
        let context = Arc::clone(&self.context);

        match context.graphics() {
            Some(graphics) if graphics.is_available() => {}
            _ => crate::engine_bail!("galaxy3d::Shader", Error::GraphicsUnavailable),
        }

        let Some(files) = context.file_provider() else {
            crate::engine_bail!("galaxy3d::Shader", Error::MissingSubsystem("FileProvider".to_string()));
        };
        let Some(dependencies) = context.dependency_tracker() else {
            crate::engine_bail!("galaxy3d::Shader", Error::MissingSubsystem("DependencyTracker".to_string()));
        };
        let config = *context.shader_config();

        let code = IncludeResolver::new(self.id, &self.name, files, dependencies)
            .with_max_depth(config.max_include_depth)
            .flatten(source)?;

        let sources = split_stages(&code, config.dialect);

        // Existing variations stay in the caches but must recompile
        for stage in ShaderStage::ALL {
            self.variations(stage).release_all();
        }

        self.sources = sources;
        self.refresh_memory_use();

        crate::engine_debug!("galaxy3d::Shader",
            "Loaded '{}' ({} bytes, {} variations)", self.name, self.memory_use, self.variation_count());

        Ok(())
    }

    fn memory_use(&self) -> u64 {
        self.memory_use
    }

    fn as_shader(&self) -> Option<&Shader> {
        Some(self)
    }

    fn as_shader_mut(&mut self) -> Option<&mut Shader> {
        Some(self)
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        // Ids are versioned, so a released id never matches a live resource
        if let Some(dependencies) = self.context.dependency_tracker() {
            dependencies.clear_dependencies(self.id);
        }
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
