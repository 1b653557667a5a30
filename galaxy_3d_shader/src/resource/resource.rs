/// Resource trait and identifiers.
///
/// Every cached asset type implements [`Resource`] so the cache can create,
/// load and reload it generically. Downcast methods give access to the
/// concrete type without going through `Any`.

use std::sync::{Arc, Mutex};
use slotmap::new_key_type;
use crate::error::Result;
use crate::io::FileStream;
use crate::resource::Shader;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a resource within a ResourceCache.
    ///
    /// Also used as the owner identity for dependency and memory tracking.
    /// `ResourceId::default()` is the null key, used for standalone resources.
    pub struct ResourceId;
}

/// Shared handle to a cached resource
pub type SharedResource = Arc<Mutex<dyn Resource>>;

// ===== TRAIT =====

/// A loadable asset
pub trait Resource: Send {
    /// Type tag the resource's factory is registered under
    fn type_name(&self) -> &'static str;

    /// Identity within the owning cache
    fn id(&self) -> ResourceId;

    /// Logical name (also the file it loads from)
    fn name(&self) -> &str;

    /// (Re)load from a stream
    ///
    /// On failure the previously loaded state is kept.
    fn load(&mut self, source: &FileStream) -> Result<()>;

    /// Approximate memory footprint in bytes
    fn memory_use(&self) -> u64;

    /// Downcast to Shader (returns None for other types)
    fn as_shader(&self) -> Option<&Shader> { None }

    /// Downcast to mutable Shader (returns None for other types)
    fn as_shader_mut(&mut self) -> Option<&mut Shader> { None }
}
