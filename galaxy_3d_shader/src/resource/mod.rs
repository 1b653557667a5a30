//! Resource management module
//!
//! Loadable resources, the subsystems they are created with, and the cache
//! that owns them and reloads them when their files change.

mod resource;
mod context;
mod dependency_map;
mod memory_ledger;
mod resource_cache;
pub mod shader;
pub mod shader_variation;

pub use resource::{Resource, ResourceId, SharedResource};
pub use context::{Context, DependencyTracker, MemoryTracker};
pub use dependency_map::DependencyMap;
pub use memory_ledger::MemoryLedger;
pub use resource_cache::{ResourceCache, ResourceFactory};
pub use shader::Shader;
pub use shader_variation::{ShaderVariation, VariationState};
