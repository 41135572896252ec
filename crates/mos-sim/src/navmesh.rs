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

//! Ray queries against a static triangle mesh.

use crate::NavmeshError;
use glam::{Mat3, Mat4, Vec2, Vec3};
use mos_core::gfx::{Mesh, Vertex};

/// Where a ray touched the navmesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Hit point in world space.
    pub position: Vec3,
    /// Unit normal of the hit triangle.
    pub normal: Vec3,
    /// Unit tangent of the hit triangle, along its first edge.
    pub tangent: Vec3,
    /// Texture coordinate interpolated at the hit point.
    pub uv: Vec2,
    /// Euclidean distance from the ray origin.
    pub distance: f32,
}

impl From<Intersection> for Vertex {
    fn from(hit: Intersection) -> Self {
        Vertex {
            position: hit.position,
            normal: hit.normal,
            tangent: hit.tangent,
            uv: hit.uv,
        }
    }
}

/// A walkable surface, stored in world space.
///
/// Built once from a mesh and the transform placing it in the world. Every
/// triangle index is checked at construction, so queries never go out of
/// bounds. Queries scan all triangles; there is no spatial index.
#[derive(Debug, Clone, Default)]
pub struct Navmesh {
    vertices: Vec<Vertex>,
    triangles: Vec<[u32; 3]>,
}

impl Navmesh {
    /// Copies `mesh` into world space using `transform`.
    ///
    /// # Errors
    ///
    /// Returns [`NavmeshError::IndexOutOfBounds`] if a triangle refers to a
    /// vertex the mesh does not have.
    pub fn new(mesh: &Mesh, transform: Mat4) -> Result<Self, NavmeshError> {
        let linear = Mat3::from_mat4(transform);
        let normal_matrix = if linear.determinant().abs() > f32::EPSILON {
            linear.inverse().transpose()
        } else {
            linear
        };

        let vertices = mesh
            .vertices
            .iter()
            .map(|v| Vertex {
                position: transform.transform_point3(v.position),
                normal: (normal_matrix * v.normal).normalize_or_zero(),
                tangent: transform.transform_vector3(v.tangent).normalize_or_zero(),
                uv: v.uv,
            })
            .collect();

        Self::from_parts(vertices, mesh.triangles.clone())
    }

    /// Builds a navmesh from world space vertices.
    ///
    /// # Errors
    ///
    /// Returns [`NavmeshError::IndexOutOfBounds`] on an invalid triangle.
    pub fn from_parts(vertices: Vec<Vertex>, triangles: Vec<[u32; 3]>) -> Result<Self, NavmeshError> {
        for (triangle, indices) in triangles.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(NavmeshError::IndexOutOfBounds {
                    triangle,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        log::debug!(
            "Built navmesh with {} vertices and {} triangles",
            vertices.len(),
            triangles.len()
        );
        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// World space vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangles as triples of vertex indices.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the hit on the first triangle, in index order, that the ray
    /// crosses. This is not necessarily the closest hit; use
    /// [`Navmesh::closest_intersection`] for that.
    pub fn intersects(&self, origin: Vec3, direction: Vec3) -> Option<Intersection> {
        self.faces().find_map(|face| face.intersects(origin, direction))
    }

    /// Returns the hit closest to `origin` over all triangles.
    pub fn closest_intersection(&self, origin: Vec3, direction: Vec3) -> Option<Intersection> {
        self.faces()
            .filter_map(|face| face.intersects(origin, direction))
            .fold(None, |closest: Option<Intersection>, hit| match closest {
                Some(best) if best.distance <= hit.distance => Some(best),
                _ => Some(hit),
            })
    }

    /// Overwrites vertex normals with flat face normals.
    ///
    /// Triangles are visited in order, so a vertex shared by several
    /// triangles ends up with the normal of the last one.
    pub fn calculate_normals(&mut self) {
        for &[i0, i1, i2] in &self.triangles {
            let normal = face_normal(
                self.vertices[i0 as usize].position,
                self.vertices[i1 as usize].position,
                self.vertices[i2 as usize].position,
            );
            for index in [i0, i1, i2] {
                self.vertices[index as usize].normal = normal;
            }
        }
    }

    fn faces(&self) -> impl Iterator<Item = Face<'_>> {
        self.triangles.iter().map(|&[i0, i1, i2]| Face {
            v0: &self.vertices[i0 as usize],
            v1: &self.vertices[i1 as usize],
            v2: &self.vertices[i2 as usize],
        })
    }
}

fn face_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    (p1 - p0).cross(p2 - p0).normalize_or_zero()
}

/// A borrowed view of one triangle.
struct Face<'a> {
    v0: &'a Vertex,
    v1: &'a Vertex,
    v2: &'a Vertex,
}

impl Face<'_> {
    /// Möller–Trumbore ray/triangle test. Edges count as inside; hits behind
    /// the origin and rays parallel to the plane do not.
    fn intersects(&self, origin: Vec3, direction: Vec3) -> Option<Intersection> {
        let (p0, p1, p2) = (self.v0.position, self.v1.position, self.v2.position);
        let e1 = p1 - p0;
        let e2 = p2 - p0;

        let p = direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = origin - p0;
        let u = inv_det * s.dot(p);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(e1);
        let v = inv_det * direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * e2.dot(q);
        if t < 0.0 {
            return None;
        }

        // Barycentric weights of (v0, v1, v2); they already sum to one.
        // Weighting by (u, v, t) instead would leak the ray distance into
        // the uv and push it outside the triangle.
        let weights = Vec3::new(1.0 - u - v, u, v);

        let position = origin + direction * t;
        Some(Intersection {
            position,
            normal: face_normal(p0, p1, p2),
            tangent: (p0 - p1).normalize_or_zero(),
            uv: self.v0.uv * weights.x + self.v1.uv * weights.y + self.v2.uv * weights.z,
            distance: origin.distance(position),
        })
    }
}
