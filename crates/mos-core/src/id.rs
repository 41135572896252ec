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

//! Process-unique identifiers for GPU-backed resources.
//!
//! Every CPU-side object that may own or reference GPU memory (meshes,
//! particle systems, boxes, textures, render targets and models) draws a [`StableId`] from a counter
//! scoped to its kind at construction. The renderer uses that id as the only
//! key for "is this already uploaded?", so ids are never reused.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// An identifier that stays attached to one resource for the lifetime of the
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StableId(u64);

impl StableId {
    /// Returns the raw value of the identifier.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A monotonically increasing source of [`StableId`]s.
///
/// Counters are lock-free and may be shared between threads.
#[derive(Debug)]
pub struct IdCounter {
    next: AtomicU64,
}

impl IdCounter {
    /// Creates a counter whose first id is `1`.
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Hands out the next identifier.
    pub fn next_id(&self) -> StableId {
        StableId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared by meshes, particle systems and render boxes.
pub static SHAPE_IDS: IdCounter = IdCounter::new();

/// Used by every [`Texture2D`](crate::gfx::Texture2D), including render target attachments.
pub static TEXTURE_IDS: IdCounter = IdCounter::new();

/// Used by [`RenderTarget`](crate::gfx::RenderTarget).
pub static TARGET_IDS: IdCounter = IdCounter::new();

/// Used by [`Model`](crate::gfx::Model). Cloning a model draws a new id.
pub static MODEL_IDS: IdCounter = IdCounter::new();

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_ids_are_monotonic() {
        let counter = IdCounter::new();
        let a = counter.next_id();
        let b = counter.next_id();
        assert!(b > a);
        assert_eq!(a.value(), 1);
    }

    #[test]
    fn test_ids_are_unique_across_threads() {
        let counter = Arc::new(IdCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || (0..1000).map(|_| counter.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 4000);
    }

    #[test]
    fn test_display() {
        let counter = IdCounter::new();
        assert_eq!(counter.next_id().to_string(), "#1");
    }
}
