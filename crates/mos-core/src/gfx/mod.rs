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

//! CPU-side scene data handed to the renderer and the simulation.
//!
//! These types are produced by the asset layer and never touch the GPU
//! themselves; the renderer uploads them lazily, keyed by their [`StableId`](crate::id::StableId).

mod camera;
mod fog;
mod light;
mod material;
mod mesh;
mod model;
mod particles;
mod render_box;
mod target;
mod texture;
mod vertex;

pub use camera::*;
pub use fog::*;
pub use light::*;
pub use material::*;
pub use mesh::*;
pub use model::*;
pub use particles::*;
pub use render_box::*;
pub use target::*;
pub use texture::*;
pub use vertex::*;
