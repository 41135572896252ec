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

//! # Mos Core
//!
//! Foundational crate containing the scene types, stable identifiers and the
//! graphics device contract shared by every other crate of the engine.
//!
//! Nothing in here talks to a GPU. Backends implement
//! [`renderer::GraphicsDevice`] and higher level crates drive it.

#![warn(missing_docs)]

pub mod asset;
pub mod gfx;
pub mod id;
pub mod renderer;

pub use glam as math;

/// Re-exports of the types used by almost every consumer of the engine.
pub mod prelude {
    pub use crate::asset::{Asset, AssetCache, AssetHandle};
    pub use crate::gfx::{
        Camera, FogLinear, Light, Material, Mesh, Model, ModelShader, Particle, Particles, RenderBox,
        RenderTarget, Texture2D, Vertex,
    };
    pub use crate::id::StableId;
    pub use crate::renderer::{GraphicsDevice, RenderSettings};
}
