// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A path-keyed, in-memory cache of asset handles.

use super::{Asset, AssetHandle};
use std::collections::HashMap;

/// A central, in-memory cache for a specific type of asset `A`.
///
/// Maps a source path to a shared [`AssetHandle<A>`] so any given asset is
/// loaded only once. The cache performs no I/O: callers hand it the loader
/// through [`AssetCache::get_or_insert_with`].
pub struct AssetCache<A: Asset> {
    storage: HashMap<String, AssetHandle<A>>,
}

impl<A: Asset> Default for AssetCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Asset> AssetCache<A> {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }

    /// Inserts an asset under `path`, replacing any previous entry, and
    /// returns a handle to it.
    pub fn insert(&mut self, path: impl Into<String>, asset: A) -> AssetHandle<A> {
        let handle = AssetHandle::new(asset);
        self.storage.insert(path.into(), handle.clone());
        handle
    }

    /// Returns the cached handle for `path`, loading it with `load` on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error. A failed load leaves the cache untouched.
    pub fn get_or_insert_with<E>(
        &mut self,
        path: &str,
        load: impl FnOnce() -> Result<A, E>,
    ) -> Result<AssetHandle<A>, E> {
        if let Some(handle) = self.storage.get(path) {
            return Ok(handle.clone());
        }
        let handle = AssetHandle::new(load()?);
        self.storage.insert(path.to_owned(), handle.clone());
        log::debug!("Cached asset '{path}'");
        Ok(handle)
    }

    /// Retrieves the handle cached under `path`.
    pub fn get(&self, path: &str) -> Option<&AssetHandle<A>> {
        self.storage.get(path)
    }

    /// Checks if an asset is cached under `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.storage.contains_key(path)
    }

    /// Number of cached assets.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Drops every entry that only the cache still references and returns
    /// how many were evicted.
    pub fn clear_unused(&mut self) -> usize {
        let before = self.storage.len();
        self.storage.retain(|_, handle| handle.use_count() > 1);
        let evicted = before - self.storage.len();
        if evicted > 0 {
            log::debug!("Evicted {evicted} unused asset(s)");
        }
        evicted
    }
}
