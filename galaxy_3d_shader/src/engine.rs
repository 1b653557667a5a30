/// Galaxy3D Engine - Singleton manager for the shader system's global state
///
/// Holds the process-wide logger and the resource cache singleton in
/// thread-safe static storage (OnceLock + RwLock).

use std::sync::{OnceLock, RwLock, Arc};
use std::time::SystemTime;
use crate::resource::ResourceCache;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Resource cache singleton
    resource_cache: RwLock<Option<Arc<ResourceCache>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            resource_cache: RwLock::new(None),
        }
    }
}

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::new())))
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use galaxy_3d_shader::galaxy3d::Engine;
/// use galaxy_3d_shader::galaxy3d::io::MemoryFileSystem;
/// use galaxy_3d_shader::galaxy3d::resource::ResourceCache;
///
/// Engine::initialize()?;
/// Engine::create_resource_cache(ResourceCache::new(Arc::new(MemoryFileSystem::new()), None))?;
///
/// let cache = Engine::resource_cache()?;
/// // Use cache...
///
/// Engine::shutdown();
/// # Ok::<(), galaxy_3d_shader::galaxy3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Log errors before returning them
    fn log_and_return_error(error: Error) -> Error {
        crate::engine_error!("galaxy3d::Engine", "{}", error);
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get().ok_or_else(|| Self::log_and_return_error(
            Error::MissingSubsystem("Engine not initialized. Call Engine::initialize() first.".to_string())
        ))
    }

    /// Initialize the engine (idempotent)
    ///
    /// # Errors
    ///
    /// Currently always succeeds, but returns Result for future extensibility.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Destroy all singletons
    ///
    /// The logger survives shutdown; call `reset_logger()` to restore the default one.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut cache) = state.resource_cache.write() {
                *cache = None;
            }
        }
    }

    // ===== RESOURCE CACHE API =====

    /// Register the resource cache singleton
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A resource cache already exists
    /// - The lock is poisoned
    pub fn create_resource_cache(cache: ResourceCache) -> Result<Arc<ResourceCache>> {
        let state = Self::state()?;

        let mut lock = state.resource_cache.write()
            .map_err(|_| Self::log_and_return_error(
                Error::InvalidResource("ResourceCache lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InvalidResource("ResourceCache already exists. Call Engine::destroy_resource_cache() first.".to_string())
            ));
        }

        let cache = Arc::new(cache);
        *lock = Some(cache.clone());

        crate::engine_info!("galaxy3d::Engine", "ResourceCache singleton created successfully");

        Ok(cache)
    }

    /// Get the resource cache singleton
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized or no cache was created.
    pub fn resource_cache() -> Result<Arc<ResourceCache>> {
        let state = Self::state()?;

        let lock = state.resource_cache.read()
            .map_err(|_| Self::log_and_return_error(
                Error::InvalidResource("ResourceCache lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::MissingSubsystem("ResourceCache not created. Call Engine::create_resource_cache() first.".to_string())
            ))
    }

    /// Destroy the resource cache singleton
    ///
    /// Outstanding `Arc<ResourceCache>` clones stay valid until dropped.
    pub fn destroy_resource_cache() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.resource_cache.write()
            .map_err(|_| Self::log_and_return_error(
                Error::InvalidResource("ResourceCache lock poisoned".to_string())
            ))?;

        *lock = None;

        crate::engine_info!("galaxy3d::Engine", "ResourceCache singleton destroyed");

        Ok(())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut cache) = state.resource_cache.write() {
                *cache = None;
            }
        }
    }

    // ===== LOGGING API =====

    /// Replace the current logger
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Restore the default console logger
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger::new());
        }
    }

    /// Log a message without location (used by engine_info!, engine_warn!, ...)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log a message with file:line information (used by engine_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
