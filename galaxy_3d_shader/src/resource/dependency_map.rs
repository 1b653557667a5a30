/// File → dependent resources map used for hot reload.

use std::sync::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::resource::{DependencyTracker, ResourceId};

pub struct DependencyMap {
    dependents: Mutex<FxHashMap<String, FxHashSet<ResourceId>>>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self {
            dependents: Mutex::new(FxHashMap::default()),
        }
    }

    /// Resources that must reload when `file` changes
    pub fn dependents(&self, file: &str) -> Vec<ResourceId> {
        self.dependents.lock()
            .map(|map| map.get(file).map(|set| set.iter().copied().collect()).unwrap_or_default())
            .unwrap_or_default()
    }

    /// Files `owner` depends on, sorted
    pub fn dependencies_of(&self, owner: ResourceId) -> Vec<String> {
        let mut files: Vec<String> = self.dependents.lock()
            .map(|map| {
                map.iter()
                    .filter(|(_, owners)| owners.contains(&owner))
                    .map(|(file, _)| file.clone())
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        files
    }

    /// Number of files with at least one dependent
    pub fn file_count(&self) -> usize {
        self.dependents.lock().map(|map| map.len()).unwrap_or(0)
    }
}

impl Default for DependencyMap {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyTracker for DependencyMap {
    fn register_dependency(&self, owner: ResourceId, file: &str) {
        if let Ok(mut map) = self.dependents.lock() {
            map.entry(file.to_string()).or_default().insert(owner);
        }
    }

    fn clear_dependencies(&self, owner: ResourceId) {
        if let Ok(mut map) = self.dependents.lock() {
            map.retain(|_, owners| {
                owners.remove(&owner);
                !owners.is_empty()
            });
        }
    }
}

#[cfg(test)]
#[path = "dependency_map_tests.rs"]
mod tests;
