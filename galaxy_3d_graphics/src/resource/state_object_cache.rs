/// Content-addressed cache of native state objects
///
/// Sampler states, rasterizer states and pipeline states are expensive to
/// create and identical descriptors can share one native object. The cache
/// maps a descriptor to the object created for it on first use. Entries live
/// as long as the device: configurations come from a small finite set.

use crate::error::Result;
use rustc_hash::FxHashMap;
use std::hash::Hash;

pub struct StateObjectCache<K, H> {
    entries: FxHashMap<K, H>,
    hits: u64,
}

impl<K: Hash + Eq, H: Clone> StateObjectCache<K, H> {
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            hits: 0,
        }
    }

    /// Return the object cached for `key`, creating it with `create` on a miss
    ///
    /// A failed creation caches nothing.
    pub fn get_or_create<F>(&mut self, key: K, create: F) -> Result<H>
    where
        F: FnOnce(&K) -> Result<H>,
    {
        if let Some(handle) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(handle.clone());
        }

        let handle = create(&key)?;
        self.entries.insert(key, handle.clone());
        Ok(handle)
    }

    pub fn get(&self, key: &K) -> Option<&H> {
        self.entries.get(key)
    }

    /// Number of distinct objects created
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups served without creating an object
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Remove every entry, handing the objects back for release
    pub fn drain(&mut self) -> Vec<(K, H)> {
        self.entries.drain().collect()
    }
}

impl<K: Hash + Eq, H: Clone> Default for StateObjectCache<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "state_object_cache_tests.rs"]
mod tests;
