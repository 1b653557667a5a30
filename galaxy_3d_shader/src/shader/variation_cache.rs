/// Per-stage cache of define-specialized shader variations.
///
/// Keyed by the xxh3 hash of the canonical define string. Equal hashes with
/// different strings share a bucket and are told apart by string comparison,
/// so a collision never aliases two variations.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::graphics::ShaderStage;
use crate::resource::{ResourceId, ShaderVariation};
use crate::shader::DefinesHash;

/// Display name of a variation of `owner_name` with `canonical` defines
///
/// The file extension is dropped, the directory kept, and defines are
/// appended with spaces turned into underscores:
/// `"Shaders/Basic.glsl"` + `"DIFFMAP VCOL"` → `"Shaders/Basic_DIFFMAP_VCOL"`.
pub fn variation_name(owner_name: &str, canonical: &str) -> String {
    let file_start = owner_name.rfind('/').map_or(0, |i| i + 1);
    let stem_end = owner_name[file_start..]
        .rfind('.')
        .map_or(owner_name.len(), |i| file_start + i);
    let base = &owner_name[..stem_end];

    if canonical.is_empty() {
        base.to_string()
    } else {
        format!("{}_{}", base, canonical.replace(' ', "_"))
    }
}

pub struct VariationCache {
    stage: ShaderStage,
    buckets: FxHashMap<DefinesHash, Vec<Arc<ShaderVariation>>>,
    len: usize,
}

impl VariationCache {
    pub fn new(stage: ShaderStage) -> Self {
        Self {
            stage,
            buckets: FxHashMap::default(),
            len: 0,
        }
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Look up the variation for already-canonical `defines`
    pub fn find(&self, defines: &str) -> Option<Arc<ShaderVariation>> {
        self.buckets
            .get(&DefinesHash::of(defines))?
            .iter()
            .find(|v| v.defines() == defines)
            .cloned()
    }

    /// Return the variation for already-canonical `defines`, creating it if needed
    ///
    /// The flag is `true` when a new variation was created.
    pub fn get_or_create(&mut self, owner: ResourceId, owner_name: &str, defines: &str) -> (Arc<ShaderVariation>, bool) {
        let bucket = self.buckets.entry(DefinesHash::of(defines)).or_default();

        if let Some(existing) = bucket.iter().find(|v| v.defines() == defines) {
            return (Arc::clone(existing), false);
        }

        let variation = Arc::new(ShaderVariation::new(
            owner,
            variation_name(owner_name, defines),
            self.stage,
            defines,
        ));
        bucket.push(Arc::clone(&variation));
        self.len += 1;

        (variation, true)
    }

    /// Release every variation's GPU object, keeping the entries
    pub fn release_all(&self) {
        for variation in self.iter() {
            variation.release();
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All cached variations (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ShaderVariation>> {
        self.buckets.values().flatten()
    }
}

#[cfg(test)]
#[path = "variation_cache_tests.rs"]
mod tests;
