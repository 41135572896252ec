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

//! The resource tables owned by the renderer and the uploads that fill them.

use crate::resource_table::ResourceTable;
use mos_core::gfx::{Mesh, Particle, Particles, Texture2D, Vertex};
use mos_core::id::StableId;
use mos_core::renderer::api::{
    BufferDescriptor, BufferId, BufferKind, BufferUsage, FilterMode, TextureDescriptor, TextureId,
    VertexArrayDescriptor, VertexArrayId,
};
use mos_core::renderer::{GraphicsDevice, ResourceError};
use std::borrow::Cow;

/// What a draw needs to know about an uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBinding {
    /// Vertex array referencing the mesh buffers.
    pub vertex_array: VertexArrayId,
    /// Number of indices to draw.
    pub index_count: u32,
}

/// How textures are sampled once uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextureSampling {
    pub filter: FilterMode,
    pub mipmaps: bool,
}

/// GPU copies of meshes, textures and particle systems, keyed by the
/// [`StableId`] of their CPU counterpart.
///
/// Vertex data lives in `array_buffers`, indices in `element_buffers`;
/// particle systems only use the former.
#[derive(Debug)]
pub struct GpuResources {
    pub(crate) textures: ResourceTable<TextureId>,
    pub(crate) array_buffers: ResourceTable<BufferId>,
    pub(crate) element_buffers: ResourceTable<BufferId>,
    pub(crate) vertex_arrays: ResourceTable<VertexArrayId>,
}

impl Default for GpuResources {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuResources {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self {
            textures: ResourceTable::new("texture"),
            array_buffers: ResourceTable::new("array buffer"),
            element_buffers: ResourceTable::new("element buffer"),
            vertex_arrays: ResourceTable::new("vertex array"),
        }
    }

    /// The texture table.
    pub fn textures(&self) -> &ResourceTable<TextureId> {
        &self.textures
    }

    /// The vertex buffer table.
    pub fn array_buffers(&self) -> &ResourceTable<BufferId> {
        &self.array_buffers
    }

    /// The index buffer table.
    pub fn element_buffers(&self) -> &ResourceTable<BufferId> {
        &self.element_buffers
    }

    /// The vertex array table.
    pub fn vertex_arrays(&self) -> &ResourceTable<VertexArrayId> {
        &self.vertex_arrays
    }

    /// Returns `true` if no table holds anything.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
            && self.array_buffers.is_empty()
            && self.element_buffers.is_empty()
            && self.vertex_arrays.is_empty()
    }

    /// Uploads the mesh buffers and vertex array unless already present.
    pub fn ensure_mesh<D: GraphicsDevice>(
        &mut self,
        device: &mut D,
        mesh: &Mesh,
    ) -> Result<MeshBinding, ResourceError> {
        let id = mesh.id();
        let vertex_buffer = self.array_buffers.ensure_uploaded(id, || {
            device.create_buffer(
                &buffer_descriptor(BufferKind::Vertex, BufferUsage::Static),
                mesh.vertex_bytes(),
            )
        })?;
        let index_buffer = self.element_buffers.ensure_uploaded(id, || {
            device.create_buffer(
                &buffer_descriptor(BufferKind::Index, BufferUsage::Static),
                mesh.index_bytes(),
            )
        })?;
        let vertex_array = self.vertex_arrays.ensure_uploaded(id, || {
            device.create_vertex_array(&VertexArrayDescriptor {
                label: None,
                vertex_buffer,
                index_buffer: Some(index_buffer),
                layout: Vertex::layout(),
            })
        })?;

        Ok(MeshBinding {
            vertex_array,
            index_count: mesh.index_count(),
        })
    }

    /// Uploads the particle buffer on first sight and rewrites it otherwise.
    pub fn ensure_particles<D: GraphicsDevice>(
        &mut self,
        device: &mut D,
        particles: &Particles,
    ) -> Result<VertexArrayId, ResourceError> {
        let id = particles.id();
        let vertex_buffer = match self.array_buffers.get(id) {
            Some(buffer) => {
                device.update_buffer(buffer, particles.bytes())?;
                buffer
            }
            None => {
                let buffer = device.create_buffer(
                    &buffer_descriptor(BufferKind::Vertex, BufferUsage::Dynamic),
                    particles.bytes(),
                )?;
                self.array_buffers.insert(id, buffer);
                buffer
            }
        };
        self.vertex_arrays.ensure_uploaded(id, || {
            device.create_vertex_array(&VertexArrayDescriptor {
                label: None,
                vertex_buffer,
                index_buffer: None,
                layout: Particle::layout(),
            })
        })
    }

    pub(crate) fn ensure_texture<D: GraphicsDevice>(
        &mut self,
        device: &mut D,
        texture: &Texture2D,
        sampling: TextureSampling,
    ) -> Result<TextureId, ResourceError> {
        self.textures.ensure_uploaded(texture.id(), || {
            device.create_texture(
                &TextureDescriptor {
                    label: None,
                    width: texture.width(),
                    height: texture.height(),
                    format: texture.format,
                    wrap: texture.wrap,
                    filter: sampling.filter,
                    mipmaps: texture.mipmaps && sampling.mipmaps,
                },
                texture.data(),
            )
        })
    }

    /// Destroys the buffers and vertex array uploaded for a mesh or a
    /// particle system. Returns `true` if anything was released.
    pub fn release_shape<D: GraphicsDevice>(&mut self, device: &mut D, id: StableId) -> bool {
        let vertex_array = self
            .vertex_arrays
            .release(id, |handle| log_failure(device.destroy_vertex_array(handle)));
        let vertices = self
            .array_buffers
            .release(id, |handle| log_failure(device.destroy_buffer(handle)));
        let indices = self
            .element_buffers
            .release(id, |handle| log_failure(device.destroy_buffer(handle)));
        vertex_array || vertices || indices
    }

    /// Destroys the GPU copy of a texture. Returns `true` if it was resident.
    pub fn release_texture<D: GraphicsDevice>(&mut self, device: &mut D, id: StableId) -> bool {
        self.textures
            .release(id, |handle| log_failure(device.destroy_texture(handle)))
    }

    /// Destroys everything in every table.
    pub fn clear<D: GraphicsDevice>(&mut self, device: &mut D) {
        for (_, handle) in self.vertex_arrays.drain() {
            log_failure(device.destroy_vertex_array(handle));
        }
        for (_, handle) in self.array_buffers.drain().chain(self.element_buffers.drain()) {
            log_failure(device.destroy_buffer(handle));
        }
        for (_, handle) in self.textures.drain() {
            log_failure(device.destroy_texture(handle));
        }
    }
}

fn buffer_descriptor(kind: BufferKind, usage: BufferUsage) -> BufferDescriptor<'static> {
    let label = match kind {
        BufferKind::Vertex => "vertices",
        BufferKind::Index => "indices",
    };
    BufferDescriptor {
        label: Some(Cow::Borrowed(label)),
        kind,
        usage,
    }
}

/// Teardown keeps going when the device rejects a handle.
pub(crate) fn log_failure(result: Result<(), ResourceError>) {
    if let Err(err) = result {
        log::warn!("Failed to release GPU resource: {err}");
    }
}
