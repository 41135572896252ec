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

use crate::renderer::api::*;
use crate::renderer::error::{ResourceError, ShaderError};
use glam::Vec4;
use std::fmt::Debug;

/// The narrow capability interface the renderer drives a GPU through.
///
/// Implementations own the driver objects and hand out opaque ids. Every
/// method must be called from the thread that owns the graphics context,
/// which is why the trait takes `&mut self` and carries no `Send` bound.
pub trait GraphicsDevice: Debug {
    /// Creates a new GPU buffer and initializes it with the provided data.
    /// ## Arguments
    /// * `descriptor` - The buffer configuration.
    /// * `data` - Initial contents.
    /// ## Returns
    /// A `Result` containing the ID of the created buffer.
    /// ## Errors
    /// * `ResourceError::CreationFailed` - If the driver refuses the allocation.
    fn create_buffer(
        &mut self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Replaces the whole contents of a buffer, resizing it if needed.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If `id` is not a live buffer.
    fn update_buffer(&mut self, id: BufferId, data: &[u8]) -> Result<(), ResourceError>;

    /// Destroys a GPU buffer.
    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError>;

    /// Creates a vertex array binding a vertex buffer, its layout and an
    /// optional index buffer.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If a referenced buffer is not live.
    fn create_vertex_array(
        &mut self,
        descriptor: &VertexArrayDescriptor,
    ) -> Result<VertexArrayId, ResourceError>;

    /// Destroys a vertex array. The buffers it referenced are left alive.
    fn destroy_vertex_array(&mut self, id: VertexArrayId) -> Result<(), ResourceError>;

    /// Creates a 2D texture, uploading `data` when present.
    /// ## Arguments
    /// * `descriptor` - Size, format, wrap, filtering and mipmap request.
    /// * `data` - Tightly packed pixels, or `None` for an uninitialized texture.
    /// ## Returns
    /// A `Result` containing the ID of the created texture.
    fn create_texture(
        &mut self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError>;

    /// Destroys a texture.
    fn destroy_texture(&mut self, id: TextureId) -> Result<(), ResourceError>;

    /// Compiles a shader module and checks the compile status.
    /// ## Errors
    /// * `ShaderError::CompilationFailed` - Carries the driver's log.
    fn create_shader_module(
        &mut self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderId, ShaderError>;

    /// Destroys a shader module. Programs it was linked into are unaffected.
    fn destroy_shader_module(&mut self, id: ShaderId) -> Result<(), ResourceError>;

    /// Links a program from compiled modules and checks the link status.
    /// ## Errors
    /// * `ShaderError::LinkFailed` - Carries the driver's log.
    fn create_program(&mut self, descriptor: &ProgramDescriptor) -> Result<ProgramId, ShaderError>;

    /// Destroys a linked program.
    fn destroy_program(&mut self, id: ProgramId) -> Result<(), ResourceError>;

    /// Resolves a uniform by name. Returns `None` if the program has no
    /// active uniform with that name.
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Creates a framebuffer with the described attachments.
    /// ## Errors
    /// * `ResourceError::IncompleteFramebuffer` - If the completeness check fails.
    ///   Nothing created by this call is left alive in that case.
    fn create_framebuffer(
        &mut self,
        descriptor: &FramebufferDescriptor,
    ) -> Result<FramebufferId, ResourceError>;

    /// Destroys a framebuffer and the depth buffer it owns. The color
    /// texture is left alive.
    fn destroy_framebuffer(&mut self, id: FramebufferId) -> Result<(), ResourceError>;

    /// Redirects output to `framebuffer`, or to the default framebuffer on `None`.
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>);

    /// Sets the output rectangle in pixels.
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Enables or disables depth testing for subsequent draws.
    fn set_depth_test(&mut self, enabled: bool);

    /// Clears the bound framebuffer. `color` clears the color buffer, `depth`
    /// the depth buffer.
    fn clear(&mut self, color: Option<Vec4>, depth: bool);

    /// Makes `program` current for the following uniform writes and draws.
    fn use_program(&mut self, program: ProgramId);

    /// Writes a uniform of the current program.
    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue);

    /// Binds `texture` to a sampler unit. `None` unbinds the unit.
    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>);

    /// Issues an indexed draw of `index_count` `u32` indices.
    fn draw_elements(
        &mut self,
        vertex_array: VertexArrayId,
        topology: PrimitiveTopology,
        index_count: u32,
    );

    /// Issues a non-indexed draw of `vertex_count` vertices.
    fn draw_arrays(
        &mut self,
        vertex_array: VertexArrayId,
        topology: PrimitiveTopology,
        vertex_count: u32,
    );
}
