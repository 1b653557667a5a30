/// Per-resource memory accounting sink.

use std::sync::Mutex;
use rustc_hash::FxHashMap;
use crate::resource::{MemoryTracker, ResourceId};

pub struct MemoryLedger {
    entries: Mutex<FxHashMap<ResourceId, u64>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    /// Last reported footprint of `resource` (0 if never reported)
    pub fn get(&self, resource: ResourceId) -> u64 {
        self.entries.lock()
            .map(|entries| entries.get(&resource).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Sum of all reported footprints
    pub fn total(&self) -> u64 {
        self.entries.lock()
            .map(|entries| entries.values().sum())
            .unwrap_or(0)
    }

    /// Stop accounting for `resource`
    pub fn remove(&self, resource: ResourceId) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(&resource);
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTracker for MemoryLedger {
    fn report(&self, resource: ResourceId, bytes: u64) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(resource, bytes);
        }
    }
}
