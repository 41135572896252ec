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

use super::conversions::{filter_pair, GlTextureFormat, IntoGl};
use glam::Vec4;
use glow::{HasContext, PixelUnpackData};
use mos_core::renderer::api::*;
use mos_core::renderer::{GraphicsDevice, ResourceError, ShaderError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const UNNAMED: &str = "unnamed";

fn label_of<'a>(label: &'a Option<std::borrow::Cow<'_, str>>) -> &'a str {
    label.as_deref().unwrap_or(UNNAMED)
}

fn creation_failed(kind: &'static str, details: String) -> ResourceError {
    ResourceError::CreationFailed { kind, details }
}

#[derive(Debug)]
struct GlBufferEntry {
    buffer: glow::Buffer,
    target: u32,
    usage: u32,
}

#[derive(Debug)]
struct GlFramebufferEntry {
    framebuffer: glow::Framebuffer,
    depth: Option<glow::Renderbuffer>,
}

/// A [`GraphicsDevice`] driving an OpenGL 3.3 core context through `glow`.
///
/// Every id handed out maps to exactly one GL object. Objects still alive
/// when the device is dropped are deleted then, so the device must be dropped
/// while its context is current.
pub struct GlDevice {
    gl: Arc<glow::Context>,
    next_id: usize,
    buffers: HashMap<BufferId, GlBufferEntry>,
    vertex_arrays: HashMap<VertexArrayId, glow::VertexArray>,
    textures: HashMap<TextureId, glow::Texture>,
    shaders: HashMap<ShaderId, glow::Shader>,
    programs: HashMap<ProgramId, glow::Program>,
    framebuffers: HashMap<FramebufferId, GlFramebufferEntry>,
    uniforms: HashMap<UniformLocation, (ProgramId, glow::UniformLocation)>,
}

impl fmt::Debug for GlDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlDevice")
            .field("buffers", &self.buffers.len())
            .field("vertex_arrays", &self.vertex_arrays.len())
            .field("textures", &self.textures.len())
            .field("shaders", &self.shaders.len())
            .field("programs", &self.programs.len())
            .field("framebuffers", &self.framebuffers.len())
            .finish()
    }
}

impl GlDevice {
    /// Wraps a GL context and sets the fixed pipeline state the renderer
    /// relies on: depth testing, alpha blending and shader-controlled
    /// point size.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread, and must stay current
    /// whenever any method of the device runs, including `Drop`.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Self {
        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.enable(glow::PROGRAM_POINT_SIZE);
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        }
        log::info!("OpenGL device created");

        Self {
            gl,
            next_id: 0,
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            textures: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            framebuffers: HashMap::new(),
            uniforms: HashMap::new(),
        }
    }

    /// The underlying context, for callers that need to issue GL calls the
    /// device does not cover (e.g. reading pixels back).
    pub fn context(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    fn allocate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn buffer(&self, id: BufferId) -> Result<&GlBufferEntry, ResourceError> {
        self.buffers.get(&id).ok_or(ResourceError::InvalidHandle {
            kind: "buffer",
            id: id.0,
        })
    }
}

impl GraphicsDevice for GlDevice {
    fn create_buffer(
        &mut self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        let target = descriptor.kind.into_gl();
        let usage = descriptor.usage.into_gl();
        let gl = &self.gl;
        let buffer = unsafe {
            let buffer = gl
                .create_buffer()
                .map_err(|e| creation_failed("buffer", e))?;
            gl.bind_buffer(target, Some(buffer));
            gl.buffer_data_u8_slice(target, data, usage);
            gl.bind_buffer(target, None);
            buffer
        };

        let id = BufferId(self.allocate_id());
        log::debug!(
            "Created buffer '{}' ({} bytes) as {:?}",
            label_of(&descriptor.label),
            data.len(),
            id
        );
        self.buffers.insert(
            id,
            GlBufferEntry {
                buffer,
                target,
                usage,
            },
        );
        Ok(id)
    }

    fn update_buffer(&mut self, id: BufferId, data: &[u8]) -> Result<(), ResourceError> {
        let entry = self.buffer(id)?;
        let gl = &self.gl;
        unsafe {
            gl.bind_buffer(entry.target, Some(entry.buffer));
            gl.buffer_data_u8_slice(entry.target, data, entry.usage);
            gl.bind_buffer(entry.target, None);
        }
        Ok(())
    }

    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError> {
        let entry = self.buffers.remove(&id).ok_or(ResourceError::InvalidHandle {
            kind: "buffer",
            id: id.0,
        })?;
        unsafe { self.gl.delete_buffer(entry.buffer) };
        log::debug!("Destroyed buffer {:?}", id);
        Ok(())
    }

    fn create_vertex_array(
        &mut self,
        descriptor: &VertexArrayDescriptor,
    ) -> Result<VertexArrayId, ResourceError> {
        let vertex_buffer = self.buffer(descriptor.vertex_buffer)?.buffer;
        let index_buffer = descriptor
            .index_buffer
            .map(|id| self.buffer(id).map(|entry| entry.buffer))
            .transpose()?;

        let gl = &self.gl;
        let layout = &descriptor.layout;
        let vertex_array = unsafe {
            let vertex_array = gl
                .create_vertex_array()
                .map_err(|e| creation_failed("vertex array", e))?;
            gl.bind_vertex_array(Some(vertex_array));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            for attribute in layout.attributes.iter() {
                gl.enable_vertex_attrib_array(attribute.location);
                gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components as i32,
                    glow::FLOAT,
                    false,
                    layout.stride as i32,
                    attribute.offset as i32,
                );
            }
            if let Some(index_buffer) = index_buffer {
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
            }
            // The element binding is VAO state; unbind the VAO first.
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            vertex_array
        };

        let id = VertexArrayId(self.allocate_id());
        log::debug!(
            "Created vertex array '{}' as {:?}",
            label_of(&descriptor.label),
            id
        );
        self.vertex_arrays.insert(id, vertex_array);
        Ok(id)
    }

    fn destroy_vertex_array(&mut self, id: VertexArrayId) -> Result<(), ResourceError> {
        let vertex_array = self
            .vertex_arrays
            .remove(&id)
            .ok_or(ResourceError::InvalidHandle {
                kind: "vertex array",
                id: id.0,
            })?;
        unsafe { self.gl.delete_vertex_array(vertex_array) };
        Ok(())
    }

    fn create_texture(
        &mut self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError> {
        let format: GlTextureFormat = descriptor.format.into_gl();
        let wrap: i32 = descriptor.wrap.into_gl();
        let (min_filter, mag_filter) = filter_pair(descriptor.filter, descriptor.mipmaps);

        let gl = &self.gl;
        let texture = unsafe {
            let texture = gl
                .create_texture()
                .map_err(|e| creation_failed("texture", e))?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format.internal,
                descriptor.width as i32,
                descriptor.height as i32,
                0,
                format.format,
                format.ty,
                PixelUnpackData::Slice(data),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, min_filter);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, mag_filter);
            if descriptor.mipmaps {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }
            gl.bind_texture(glow::TEXTURE_2D, None);
            texture
        };

        let id = TextureId(self.allocate_id());
        log::debug!(
            "Created texture '{}' ({}x{}, {:?}) as {:?}",
            label_of(&descriptor.label),
            descriptor.width,
            descriptor.height,
            descriptor.format,
            id
        );
        self.textures.insert(id, texture);
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) -> Result<(), ResourceError> {
        let texture = self.textures.remove(&id).ok_or(ResourceError::InvalidHandle {
            kind: "texture",
            id: id.0,
        })?;
        unsafe { self.gl.delete_texture(texture) };
        log::debug!("Destroyed texture {:?}", id);
        Ok(())
    }

    fn create_shader_module(
        &mut self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderId, ShaderError> {
        let label = label_of(&descriptor.label);
        let gl = &self.gl;
        let shader = unsafe {
            let shader = gl
                .create_shader(descriptor.stage.into_gl())
                .map_err(|log| ShaderError::CompilationFailed {
                    label: label.to_owned(),
                    stage: descriptor.stage,
                    log,
                })?;
            gl.shader_source(shader, &descriptor.source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(ShaderError::CompilationFailed {
                    label: label.to_owned(),
                    stage: descriptor.stage,
                    log,
                });
            }
            shader
        };

        let id = ShaderId(self.allocate_id());
        log::debug!("Compiled {} shader '{}' as {:?}", descriptor.stage, label, id);
        self.shaders.insert(id, shader);
        Ok(id)
    }

    fn destroy_shader_module(&mut self, id: ShaderId) -> Result<(), ResourceError> {
        let shader = self.shaders.remove(&id).ok_or(ResourceError::InvalidHandle {
            kind: "shader module",
            id: id.0,
        })?;
        unsafe { self.gl.delete_shader(shader) };
        Ok(())
    }

    fn create_program(&mut self, descriptor: &ProgramDescriptor) -> Result<ProgramId, ShaderError> {
        let label = label_of(&descriptor.label).to_owned();
        let link_failed = |log: String| ShaderError::LinkFailed {
            label: label.clone(),
            log,
        };
        let vertex = *self
            .shaders
            .get(&descriptor.vertex)
            .ok_or_else(|| link_failed(format!("unknown vertex module {:?}", descriptor.vertex)))?;
        let fragment = *self.shaders.get(&descriptor.fragment).ok_or_else(|| {
            link_failed(format!("unknown fragment module {:?}", descriptor.fragment))
        })?;

        let gl = &self.gl;
        let program = unsafe {
            let program = gl.create_program().map_err(link_failed)?;
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);
            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);
            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(link_failed(log));
            }
            program
        };

        let id = ProgramId(self.allocate_id());
        log::debug!("Linked program '{}' as {:?}", label, id);
        self.programs.insert(id, program);
        Ok(id)
    }

    fn destroy_program(&mut self, id: ProgramId) -> Result<(), ResourceError> {
        let program = self.programs.remove(&id).ok_or(ResourceError::InvalidHandle {
            kind: "program",
            id: id.0,
        })?;
        self.uniforms.retain(|_, (owner, _)| *owner != id);
        unsafe { self.gl.delete_program(program) };
        log::debug!("Destroyed program {:?}", id);
        Ok(())
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let native = *self.programs.get(&program)?;
        let location = unsafe { self.gl.get_uniform_location(native, name) }?;
        let id = UniformLocation(self.allocate_id());
        self.uniforms.insert(id, (program, location));
        Some(id)
    }

    fn create_framebuffer(
        &mut self,
        descriptor: &FramebufferDescriptor,
    ) -> Result<FramebufferId, ResourceError> {
        let color = *self
            .textures
            .get(&descriptor.color)
            .ok_or(ResourceError::InvalidHandle {
                kind: "texture",
                id: descriptor.color.0,
            })?;
        let label = label_of(&descriptor.label);

        let gl = &self.gl;
        let entry = unsafe {
            let framebuffer = gl
                .create_framebuffer()
                .map_err(|e| creation_failed("framebuffer", e))?;
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color),
                0,
            );

            let depth = if descriptor.depth {
                let renderbuffer = match gl.create_renderbuffer() {
                    Ok(renderbuffer) => renderbuffer,
                    Err(e) => {
                        gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                        gl.delete_framebuffer(framebuffer);
                        return Err(creation_failed("renderbuffer", e));
                    }
                };
                gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
                gl.renderbuffer_storage(
                    glow::RENDERBUFFER,
                    glow::DEPTH_COMPONENT24,
                    descriptor.width as i32,
                    descriptor.height as i32,
                );
                gl.framebuffer_renderbuffer(
                    glow::FRAMEBUFFER,
                    glow::DEPTH_ATTACHMENT,
                    glow::RENDERBUFFER,
                    Some(renderbuffer),
                );
                gl.bind_renderbuffer(glow::RENDERBUFFER, None);
                Some(renderbuffer)
            } else {
                None
            };

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            if status != glow::FRAMEBUFFER_COMPLETE {
                if let Some(renderbuffer) = depth {
                    gl.delete_renderbuffer(renderbuffer);
                }
                gl.delete_framebuffer(framebuffer);
                return Err(ResourceError::IncompleteFramebuffer {
                    label: label.to_owned(),
                    status,
                });
            }
            GlFramebufferEntry { framebuffer, depth }
        };

        let id = FramebufferId(self.allocate_id());
        log::debug!(
            "Created framebuffer '{}' ({}x{}) as {:?}",
            label,
            descriptor.width,
            descriptor.height,
            id
        );
        self.framebuffers.insert(id, entry);
        Ok(id)
    }

    fn destroy_framebuffer(&mut self, id: FramebufferId) -> Result<(), ResourceError> {
        let entry = self
            .framebuffers
            .remove(&id)
            .ok_or(ResourceError::InvalidHandle {
                kind: "framebuffer",
                id: id.0,
            })?;
        unsafe {
            if let Some(renderbuffer) = entry.depth {
                self.gl.delete_renderbuffer(renderbuffer);
            }
            self.gl.delete_framebuffer(entry.framebuffer);
        }
        log::debug!("Destroyed framebuffer {:?}", id);
        Ok(())
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) {
        let native = match framebuffer {
            Some(id) => match self.framebuffers.get(&id) {
                Some(entry) => Some(entry.framebuffer),
                None => {
                    log::warn!("Binding unknown framebuffer {:?}, using the default one", id);
                    None
                }
            },
            None => None,
        };
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, native) };
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { self.gl.viewport(x, y, width as i32, height as i32) };
    }

    fn set_depth_test(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn clear(&mut self, color: Option<Vec4>, depth: bool) {
        let mut mask = 0;
        unsafe {
            if let Some(color) = color {
                self.gl.clear_color(color.x, color.y, color.z, color.w);
                mask |= glow::COLOR_BUFFER_BIT;
            }
            if depth {
                mask |= glow::DEPTH_BUFFER_BIT;
            }
            if mask != 0 {
                self.gl.clear(mask);
            }
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        match self.programs.get(&program) {
            Some(native) => unsafe { self.gl.use_program(Some(*native)) },
            None => log::warn!("Using unknown program {:?}", program),
        }
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let Some((_, native)) = self.uniforms.get(&location) else {
            log::trace!("Skipping write to unknown uniform {:?}", location);
            return;
        };
        let gl = &self.gl;
        let native = Some(native);
        unsafe {
            match value {
                UniformValue::Float(v) => gl.uniform_1_f32(native, v),
                UniformValue::Int(v) => gl.uniform_1_i32(native, v),
                UniformValue::Bool(v) => gl.uniform_1_i32(native, i32::from(v)),
                UniformValue::Vec2(v) => gl.uniform_2_f32(native, v.x, v.y),
                UniformValue::Vec3(v) => gl.uniform_3_f32(native, v.x, v.y, v.z),
                UniformValue::Vec4(v) => gl.uniform_4_f32(native, v.x, v.y, v.z, v.w),
                UniformValue::Mat3(m) => {
                    gl.uniform_matrix_3_f32_slice(native, false, &m.to_cols_array())
                }
                UniformValue::Mat4(m) => {
                    gl.uniform_matrix_4_f32_slice(native, false, &m.to_cols_array())
                }
            }
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>) {
        let native = texture.and_then(|id| {
            let native = self.textures.get(&id).copied();
            if native.is_none() {
                log::warn!("Binding unknown texture {:?} to unit {}", id, unit);
            }
            native
        });
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, native);
        }
    }

    fn draw_elements(
        &mut self,
        vertex_array: VertexArrayId,
        topology: PrimitiveTopology,
        index_count: u32,
    ) {
        let Some(native) = self.vertex_arrays.get(&vertex_array) else {
            log::warn!("Skipping draw of unknown vertex array {:?}", vertex_array);
            return;
        };
        unsafe {
            self.gl.bind_vertex_array(Some(*native));
            self.gl.draw_elements(
                topology.into_gl(),
                index_count as i32,
                glow::UNSIGNED_INT,
                0,
            );
            self.gl.bind_vertex_array(None);
        }
    }

    fn draw_arrays(
        &mut self,
        vertex_array: VertexArrayId,
        topology: PrimitiveTopology,
        vertex_count: u32,
    ) {
        let Some(native) = self.vertex_arrays.get(&vertex_array) else {
            log::warn!("Skipping draw of unknown vertex array {:?}", vertex_array);
            return;
        };
        unsafe {
            self.gl.bind_vertex_array(Some(*native));
            self.gl
                .draw_arrays(topology.into_gl(), 0, vertex_count as i32);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for GlDevice {
    fn drop(&mut self) {
        let gl = &self.gl;
        let live = self.vertex_arrays.len()
            + self.buffers.len()
            + self.framebuffers.len()
            + self.textures.len()
            + self.programs.len()
            + self.shaders.len();
        if live > 0 {
            log::debug!("Deleting {} GL objects still alive on device drop", live);
        }
        unsafe {
            for (_, vertex_array) in self.vertex_arrays.drain() {
                gl.delete_vertex_array(vertex_array);
            }
            for (_, entry) in self.buffers.drain() {
                gl.delete_buffer(entry.buffer);
            }
            for (_, entry) in self.framebuffers.drain() {
                if let Some(renderbuffer) = entry.depth {
                    gl.delete_renderbuffer(renderbuffer);
                }
                gl.delete_framebuffer(entry.framebuffer);
            }
            for (_, texture) in self.textures.drain() {
                gl.delete_texture(texture);
            }
            for (_, program) in self.programs.drain() {
                gl.delete_program(program);
            }
            for (_, shader) in self.shaders.drain() {
                gl.delete_shader(shader);
            }
        }
        self.uniforms.clear();
    }
}
