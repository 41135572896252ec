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

//! # Mos Render
//!
//! Keeps the GPU copy of a changing scene consistent with the CPU one.
//!
//! The [`Renderer`] is the entry point. It uploads meshes, textures and
//! particle buffers the first time it sees their [`StableId`](mos_core::id::StableId),
//! releases them on unload, redirects output to render targets and issues
//! the draws. Everything goes through a [`GraphicsDevice`](mos_core::renderer::GraphicsDevice),
//! so the same code runs on OpenGL or on a recording fake in tests.

#![warn(missing_docs)]

mod drawable;
mod error;
mod programs;
mod render_target;
mod renderer;
mod resource_table;
mod resources;
pub mod shaders;

pub use drawable::{Drawable, RenderContext};
pub use error::RenderError;
pub use programs::{
    ProgramData, ProgramKey, ProgramRegistry, ProgramUniforms, SimpleUniforms, StandardUniforms,
};
pub use render_target::RenderTargetManager;
pub use renderer::Renderer;
pub use resource_table::ResourceTable;
pub use resources::{GpuResources, MeshBinding};
