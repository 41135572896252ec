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

//! A map from CPU-side identifiers to driver handles.

use ahash::AHashMap;
use mos_core::id::StableId;
use std::fmt::Debug;

/// Tracks at most one live driver handle per [`StableId`].
///
/// The table never talks to the device itself: creation and destruction are
/// passed in as closures so one implementation serves buffers, textures,
/// vertex arrays and framebuffers alike.
#[derive(Debug)]
pub struct ResourceTable<H> {
    label: &'static str,
    entries: AHashMap<StableId, H>,
}

impl<H: Copy + Debug> ResourceTable<H> {
    /// Creates an empty table. `label` names the resource kind in logs.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: AHashMap::new(),
        }
    }

    /// Returns the handle for `id`, running `create` only if there is none yet.
    ///
    /// # Errors
    ///
    /// Propagates the error from `create`, in which case no entry is added.
    pub fn ensure_uploaded<E>(
        &mut self,
        id: StableId,
        create: impl FnOnce() -> Result<H, E>,
    ) -> Result<H, E> {
        if let Some(&handle) = self.entries.get(&id) {
            return Ok(handle);
        }
        let handle = create()?;
        log::debug!("Uploaded {} {id} as {handle:?}", self.label);
        self.entries.insert(id, handle);
        Ok(handle)
    }

    /// Registers a handle created elsewhere, returning the one it displaces.
    /// The caller owns the displaced handle and must destroy it.
    pub fn insert(&mut self, id: StableId, handle: H) -> Option<H> {
        let previous = self.entries.insert(id, handle);
        if let Some(previous) = previous {
            log::warn!("Replaced {} {id}: {previous:?} -> {handle:?}", self.label);
        }
        previous
    }

    /// Removes the entry for `id` and hands its handle to `destroy`.
    ///
    /// Returns `false` without calling `destroy` if there was no entry.
    pub fn release(&mut self, id: StableId, destroy: impl FnOnce(H)) -> bool {
        match self.entries.remove(&id) {
            Some(handle) => {
                log::debug!("Released {} {id} ({handle:?})", self.label);
                destroy(handle);
                true
            }
            None => false,
        }
    }

    /// Returns the handle for `id`, if uploaded.
    pub fn get(&self, id: StableId) -> Option<H> {
        self.entries.get(&id).copied()
    }

    /// Checks if `id` has a live handle.
    pub fn contains(&self, id: StableId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Removes every entry, yielding the handles so the caller can destroy them.
    pub fn drain(&mut self) -> impl Iterator<Item = (StableId, H)> + '_ {
        self.entries.drain()
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no handle.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
