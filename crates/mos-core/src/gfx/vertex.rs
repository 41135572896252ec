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

use crate::renderer::api::{VertexAttribute, VertexLayout};
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::borrow::Cow;
use std::mem::{offset_of, size_of};

/// A mesh vertex as stored on the CPU and uploaded verbatim to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space.
    pub position: Vec3,
    /// Unit surface normal.
    pub normal: Vec3,
    /// Unit tangent, used for normal mapping.
    pub tangent: Vec3,
    /// Texture coordinate.
    pub uv: Vec2,
}

const VERTEX_ATTRIBUTES: [VertexAttribute; 4] = [
    VertexAttribute {
        location: 0,
        components: 3,
        offset: offset_of!(Vertex, position) as u32,
    },
    VertexAttribute {
        location: 1,
        components: 3,
        offset: offset_of!(Vertex, normal) as u32,
    },
    VertexAttribute {
        location: 2,
        components: 3,
        offset: offset_of!(Vertex, tangent) as u32,
    },
    VertexAttribute {
        location: 3,
        components: 2,
        offset: offset_of!(Vertex, uv) as u32,
    },
];

impl Vertex {
    /// Creates a vertex with a zero tangent.
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            tangent: Vec3::ZERO,
            uv,
        }
    }

    /// The GPU layout matching the shader inputs at locations 0 to 3.
    pub fn layout() -> VertexLayout<'static> {
        VertexLayout {
            stride: size_of::<Vertex>() as u32,
            attributes: Cow::Borrowed(&VERTEX_ATTRIBUTES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(size_of::<Vertex>(), 44);
        let layout = Vertex::layout();
        assert_eq!(layout.stride, 44);
        let offsets: Vec<u32> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 36]);
    }
}
