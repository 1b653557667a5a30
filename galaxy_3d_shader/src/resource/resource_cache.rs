/// Resource cache: creates, loads, reloads and releases resources by name.
///
/// Resource types are registered as factory closures under a type tag. The
/// cache owns the dependency map and memory ledger handed to every resource
/// through its [`Context`], and consumes the dependency edges on hot reload:
/// `file_changed` reloads the resource loaded from that file and every
/// resource that included it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use crate::error::{Error, Result};
use crate::graphics::Graphics;
use crate::io::FileProvider;
use crate::resource::{
    Context, DependencyMap, DependencyTracker, MemoryLedger, Resource, ResourceId, SharedResource,
};
use crate::shader::ShaderConfig;

/// Creates an unloaded resource with the given id, name and context
pub type ResourceFactory = Box<dyn Fn(ResourceId, &str, Arc<Context>) -> SharedResource + Send + Sync>;

struct CachedResource {
    type_name: String,
    name: String,
    resource: SharedResource,
}

pub struct ResourceCache {
    files: Arc<dyn FileProvider>,
    dependencies: Arc<DependencyMap>,
    memory: Arc<MemoryLedger>,
    context: Arc<Context>,
    factories: RwLock<FxHashMap<String, ResourceFactory>>,
    resources: RwLock<SlotMap<ResourceId, CachedResource>>,
    /// (type, name) → id
    lookup: RwLock<FxHashMap<(String, String), ResourceId>>,
    /// Held while a resource is created and first loaded
    creating: Mutex<()>,
}

impl ResourceCache {
    /// Create a cache reading from `files`, with the default shader config
    pub fn new(files: Arc<dyn FileProvider>, graphics: Option<Arc<dyn Graphics>>) -> Self {
        Self::with_config(files, graphics, ShaderConfig::default())
    }

    /// Create a cache with an explicit shader config
    pub fn with_config(
        files: Arc<dyn FileProvider>,
        graphics: Option<Arc<dyn Graphics>>,
        shader_config: ShaderConfig,
    ) -> Self {
        let dependencies = Arc::new(DependencyMap::new());
        let memory = Arc::new(MemoryLedger::new());

        let mut context = Context::new()
            .with_file_provider(files.clone())
            .with_dependency_tracker(dependencies.clone())
            .with_memory_tracker(memory.clone())
            .with_shader_config(shader_config);
        if let Some(graphics) = graphics {
            context = context.with_graphics(graphics);
        }

        Self {
            files,
            dependencies,
            memory,
            context: Arc::new(context),
            factories: RwLock::new(FxHashMap::default()),
            resources: RwLock::new(SlotMap::with_key()),
            lookup: RwLock::new(FxHashMap::default()),
            creating: Mutex::new(()),
        }
    }

    /// Log errors before returning them
    fn log_and_return_error(error: Error) -> Error {
        crate::engine_error!("galaxy3d::ResourceCache", "{}", error);
        error
    }

    fn poisoned(what: &str) -> Error {
        Self::log_and_return_error(Error::InvalidResource(format!("ResourceCache {} lock poisoned", what)))
    }

    fn lock_resource(resource: &SharedResource) -> Result<MutexGuard<'_, dyn Resource + 'static>> {
        resource.lock().map_err(|_| Self::poisoned("resource"))
    }

    // ===== FACTORIES =====

    /// Register (or replace) the factory for `type_name`
    pub fn register_factory<F>(&self, type_name: &str, factory: F)
    where
        F: Fn(ResourceId, &str, Arc<Context>) -> SharedResource + Send + Sync + 'static,
    {
        if let Ok(mut factories) = self.factories.write() {
            factories.insert(type_name.to_string(), Box::new(factory));
        }
    }

    /// Whether a factory is registered for `type_name`
    pub fn has_factory(&self, type_name: &str) -> bool {
        self.factories.read().map(|f| f.contains_key(type_name)).unwrap_or(false)
    }

    // ===== LOOKUP =====

    /// Get a resource, creating and loading it on first request
    ///
    /// A resource whose first load fails is discarded. Creation is
    /// serialized, so concurrent first requests for one name share a single
    /// resource.
    ///
    /// # Errors
    ///
    /// - `Error::UnknownResourceType` if no factory is registered for `type_name`
    /// - `Error::FileNotFound` if the provider cannot open `name`
    /// - any error returned by the resource's `load`
    pub fn get_resource(&self, type_name: &str, name: &str) -> Result<SharedResource> {
        if let Some(resource) = self.find_resource(type_name, name) {
            return Ok(resource);
        }

        if !self.has_factory(type_name) {
            return Err(Self::log_and_return_error(Error::UnknownResourceType(type_name.to_string())));
        }

        // Holds no data; recover from poisoning
        let _creating = self.creating.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(resource) = self.find_resource(type_name, name) {
            return Ok(resource);
        }

        let stream = self.files.open(name).map_err(Self::log_and_return_error)?;

        let (id, resource) = {
            let factories = self.factories.read().map_err(|_| Self::poisoned("factory"))?;
            let factory = factories.get(type_name).ok_or_else(|| Self::log_and_return_error(
                Error::UnknownResourceType(type_name.to_string())
            ))?;

            let mut resources = self.resources.write().map_err(|_| Self::poisoned("resource table"))?;
            let id = resources.insert_with_key(|id| CachedResource {
                type_name: type_name.to_string(),
                name: name.to_string(),
                resource: factory(id, name, Arc::clone(&self.context)),
            });
            (id, Arc::clone(&resources[id].resource))
        };

        let loaded = Self::lock_resource(&resource).and_then(|mut r| r.load(&stream));
        if let Err(err) = loaded {
            crate::engine_warn!("galaxy3d::ResourceCache",
                "Discarding {} '{}' after failed load", type_name, name);
            self.forget(id);
            return Err(err);
        }

        self.lookup.write()
            .map_err(|_| Self::poisoned("lookup"))?
            .insert((type_name.to_string(), name.to_string()), id);

        crate::engine_info!("galaxy3d::ResourceCache", "Loaded {} '{}'", type_name, name);
        Ok(resource)
    }

    /// Get an already loaded resource
    pub fn find_resource(&self, type_name: &str, name: &str) -> Option<SharedResource> {
        self.resource(self.resource_id(type_name, name)?)
    }

    /// Id of an already loaded resource
    pub fn resource_id(&self, type_name: &str, name: &str) -> Option<ResourceId> {
        self.lookup.read().ok()?
            .get(&(type_name.to_string(), name.to_string()))
            .copied()
    }

    /// Resource by id
    pub fn resource(&self, id: ResourceId) -> Option<SharedResource> {
        self.resources.read().ok()?
            .get(id)
            .map(|cached| Arc::clone(&cached.resource))
    }

    // ===== RELOAD =====

    /// Reload a resource from its file
    ///
    /// Its dependencies are cleared first and re-registered by the load.
    /// On failure the resource keeps its previous state and dependencies.
    pub fn reload_resource(&self, id: ResourceId) -> Result<()> {
        let (name, resource) = {
            let resources = self.resources.read().map_err(|_| Self::poisoned("resource table"))?;
            let cached = resources.get(id).ok_or_else(|| Self::log_and_return_error(
                Error::InvalidResource(format!("Unknown resource id {:?}", id))
            ))?;
            (cached.name.clone(), Arc::clone(&cached.resource))
        };

        let stream = self.files.open(&name).map_err(Self::log_and_return_error)?;

        let previous = self.dependencies.dependencies_of(id);
        self.dependencies.clear_dependencies(id);

        if let Err(err) = Self::lock_resource(&resource).and_then(|mut r| r.load(&stream)) {
            // Keep watching what the last good load depended on
            self.dependencies.clear_dependencies(id);
            for file in &previous {
                self.dependencies.register_dependency(id, file);
            }
            return Err(err);
        }

        crate::engine_info!("galaxy3d::ResourceCache", "Reloaded '{}'", name);
        Ok(())
    }

    /// Reload everything affected by a change to `file`
    ///
    /// Affected resources are the one loaded from `file` (if any) and every
    /// resource that registered `file` as a dependency. Returns each reloaded
    /// id with its outcome.
    pub fn file_changed(&self, file: &str) -> Vec<(ResourceId, Result<()>)> {
        let mut affected: Vec<ResourceId> = self.resources.read()
            .map(|resources| {
                resources.iter()
                    .filter(|(_, cached)| cached.name == file)
                    .map(|(id, _)| id)
                    .collect()
            })
            .unwrap_or_default();

        for id in self.dependencies.dependents(file) {
            if !affected.contains(&id) {
                affected.push(id);
            }
        }

        if !affected.is_empty() {
            crate::engine_debug!("galaxy3d::ResourceCache",
                "'{}' changed, reloading {} resource(s)", file, affected.len());
        }

        affected.into_iter()
            .map(|id| (id, self.reload_resource(id)))
            .collect()
    }

    // ===== RELEASE =====

    /// Drop a resource from the cache, forgetting its dependencies and memory
    ///
    /// Returns `false` if `id` is unknown. Outstanding handles stay usable.
    pub fn release_resource(&self, id: ResourceId) -> bool {
        let released = self.forget(id);
        if let Some(cached) = &released {
            crate::engine_debug!("galaxy3d::ResourceCache",
                "Released {} '{}'", cached.type_name, cached.name);
        }
        released.is_some()
    }

    fn forget(&self, id: ResourceId) -> Option<CachedResource> {
        let cached = self.resources.write().ok()?.remove(id)?;

        if let Ok(mut lookup) = self.lookup.write() {
            lookup.retain(|_, existing| *existing != id);
        }
        self.dependencies.clear_dependencies(id);
        self.memory.remove(id);

        Some(cached)
    }

    // ===== ACCOUNTING =====

    /// Last reported memory use of a resource
    pub fn memory_use(&self, id: ResourceId) -> u64 {
        self.memory.get(id)
    }

    /// Sum of all reported memory use
    pub fn total_memory_use(&self) -> u64 {
        self.memory.total()
    }

    /// Number of cached resources
    pub fn resource_count(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    /// Context handed to resources created by this cache
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    pub fn file_provider(&self) -> &dyn FileProvider {
        self.files.as_ref()
    }
}

#[cfg(test)]
#[path = "resource_cache_tests.rs"]
mod tests;
