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

use super::Vertex;
use crate::asset::Asset;
use crate::id::{StableId, SHAPE_IDS};

/// Indexed triangle geometry.
///
/// A mesh is uploaded once per [`StableId`]; editing `vertices` or
/// `triangles` after the first upload is not reflected on the GPU until the
/// mesh is unloaded and loaded again.
#[derive(Debug)]
pub struct Mesh {
    id: StableId,
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangles as triples of indices into `vertices`.
    pub triangles: Vec<[u32; 3]>,
}

impl Asset for Mesh {}

impl Mesh {
    /// Creates a mesh and assigns it a fresh shape id.
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            id: SHAPE_IDS.next_id(),
            vertices,
            triangles,
        }
    }

    /// The stable id of this mesh.
    pub fn id(&self) -> StableId {
        self.id
    }

    /// Number of indices drawn, three per triangle.
    pub fn index_count(&self) -> u32 {
        (self.triangles.len() * 3) as u32
    }

    /// The vertex data as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index data as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meshes_get_distinct_ids() {
        let a = Mesh::new(Vec::new(), Vec::new());
        let b = Mesh::new(Vec::new(), Vec::new());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_index_bytes() {
        let mesh = Mesh::new(vec![Vertex::default(); 3], vec![[0, 1, 2]]);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.index_bytes().len(), 12);
        assert_eq!(mesh.vertex_bytes().len(), 3 * 44);
    }
}
