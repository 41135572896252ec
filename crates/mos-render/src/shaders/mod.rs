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

//! GLSL sources of the built-in programs.
//!
//! The sources are opaque to the renderer: they are handed to the device
//! unchanged. Attribute locations match [`Vertex::layout`](mos_core::gfx::Vertex::layout)
//! and [`Particle::layout`](mos_core::gfx::Particle::layout).

use crate::programs::ProgramKey;
use mos_core::gfx::ModelShader;

/// Lit, textured models.
pub const STANDARD_VERT: &str = include_str!("standard.vert");
/// Lit, textured models.
pub const STANDARD_FRAG: &str = include_str!("standard.frag");
/// Glyph quads.
pub const TEXT_VERT: &str = include_str!("text.vert");
/// Glyph quads.
pub const TEXT_FRAG: &str = include_str!("text.frag");
/// Point sprites.
pub const PARTICLES_VERT: &str = include_str!("particles.vert");
/// Point sprites.
pub const PARTICLES_FRAG: &str = include_str!("particles.frag");
/// Wireframe boxes.
pub const BOX_VERT: &str = include_str!("box.vert");
/// Wireframe boxes.
pub const BOX_FRAG: &str = include_str!("box.frag");

/// Every built-in program as `(key, vertex source, fragment source)`.
pub fn builtin() -> [(ProgramKey, &'static str, &'static str); 4] {
    [
        (ProgramKey::Model(ModelShader::Standard), STANDARD_VERT, STANDARD_FRAG),
        (ProgramKey::Model(ModelShader::Text), TEXT_VERT, TEXT_FRAG),
        (ProgramKey::Particles, PARTICLES_VERT, PARTICLES_FRAG),
        (ProgramKey::Box, BOX_VERT, BOX_FRAG),
    ]
}
