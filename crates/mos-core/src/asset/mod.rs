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

//! Shared ownership of loaded assets.
//!
//! Assets are loaded once and shared by every scene object that refers to
//! them through an [`AssetHandle`]. The [`AssetCache`] keeps one handle per
//! source path and can evict the entries nobody else holds anymore.

mod cache;
mod handle;

pub use cache::*;
pub use handle::*;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits allow assets to be loaded on one thread and shared with
/// the render thread.
///
/// # Examples
///
/// ```
/// use mos_core::asset::{Asset, AssetHandle};
///
/// struct Sound {
///     samples: Vec<i16>,
/// }
///
/// impl Asset for Sound {}
///
/// let handle = AssetHandle::new(Sound { samples: vec![0; 4] });
/// assert_eq!(handle.samples.len(), 4);
/// ```
pub trait Asset: Send + Sync + 'static {}
