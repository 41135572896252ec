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

use crate::id::{StableId, SHAPE_IDS};
use crate::renderer::api::{VertexAttribute, VertexLayout};
use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use std::borrow::Cow;
use std::mem::{offset_of, size_of};

/// One point sprite.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Particle {
    /// Position in world space.
    pub position: Vec3,
    /// RGBA color. Kept as an array so the struct has no SIMD padding.
    pub color: [f32; 4],
    /// Point size in pixels.
    pub size: f32,
}

const PARTICLE_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        location: 0,
        components: 3,
        offset: offset_of!(Particle, position) as u32,
    },
    VertexAttribute {
        location: 1,
        components: 4,
        offset: offset_of!(Particle, color) as u32,
    },
    VertexAttribute {
        location: 2,
        components: 1,
        offset: offset_of!(Particle, size) as u32,
    },
];

impl Particle {
    /// Creates a particle.
    pub fn new(position: Vec3, color: Vec4, size: f32) -> Self {
        Self {
            position,
            color: color.to_array(),
            size,
        }
    }

    /// The GPU layout matching the particle program inputs.
    pub fn layout() -> VertexLayout<'static> {
        VertexLayout {
            stride: size_of::<Particle>() as u32,
            attributes: Cow::Borrowed(&PARTICLE_ATTRIBUTES),
        }
    }
}

/// A particle system. Its contents are expected to change every frame and
/// are re-sent to the GPU on every draw.
#[derive(Debug)]
pub struct Particles {
    id: StableId,
    /// The live particles.
    pub particles: Vec<Particle>,
}

impl Default for Particles {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Particles {
    /// Creates a particle system and assigns it a fresh shape id.
    pub fn new(particles: Vec<Particle>) -> Self {
        Self {
            id: SHAPE_IDS.next_id(),
            particles,
        }
    }

    /// The stable id of this particle system.
    pub fn id(&self) -> StableId {
        self.id
    }

    /// The particle data as raw bytes.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns `true` if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
