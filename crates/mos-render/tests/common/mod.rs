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

//! A `GraphicsDevice` that performs no GPU work and records every call.

#![allow(dead_code)]

use glam::{Vec2, Vec3, Vec4};
use mos_core::asset::AssetHandle;
use mos_core::gfx::{Material, Mesh, Model, Texture2D, Vertex};
use mos_core::renderer::api::*;
use mos_core::renderer::{GraphicsDevice, ResourceError, ShaderError};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateBuffer(BufferId),
    UpdateBuffer(BufferId),
    DestroyBuffer(BufferId),
    CreateVertexArray(VertexArrayId),
    DestroyVertexArray(VertexArrayId),
    CreateTexture(TextureId),
    DestroyTexture(TextureId),
    CreateShader(ShaderId),
    DestroyShader(ShaderId),
    CreateProgram(ProgramId),
    DestroyProgram(ProgramId),
    CreateFramebuffer(FramebufferId),
    DestroyFramebuffer(FramebufferId),
    BindFramebuffer(Option<FramebufferId>),
    Viewport(u32, u32),
    DepthTest(bool),
    Clear(Option<Vec4>, bool),
    UseProgram(ProgramId),
    SetUniform(String, UniformValue),
    BindTexture(u32, Option<TextureId>),
    DrawElements(VertexArrayId, PrimitiveTopology, u32),
    DrawArrays(VertexArrayId, PrimitiveTopology, u32),
}

#[derive(Debug, Default)]
pub struct DeviceLog {
    pub calls: Vec<Call>,
    /// Objects created and not yet destroyed, as `(kind, id)`.
    pub live: HashSet<(&'static str, usize)>,
    /// Makes `create_shader_module` fail for this stage.
    pub fail_compile: Option<ShaderStage>,
    pub fail_link: bool,
    pub incomplete_framebuffer: bool,
    next_id: usize,
    uniform_names: Vec<String>,
}

impl DeviceLog {
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn live_of(&self, kind: &str) -> usize {
        self.live.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Vertex arrays drawn, in draw order.
    pub fn draws(&self) -> Vec<VertexArrayId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::DrawElements(vao, _, _) | Call::DrawArrays(vao, _, _) => Some(*vao),
                _ => None,
            })
            .collect()
    }

    /// Every value written to the uniform called `name`, in order.
    pub fn uniform_values(&self, name: &str) -> Vec<UniformValue> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::SetUniform(n, value) if n == name => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniform_values(name).last().copied()
    }

    pub fn created_vertex_arrays(&self) -> Vec<VertexArrayId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::CreateVertexArray(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn allocate(&mut self, kind: &'static str) -> usize {
        self.next_id += 1;
        self.live.insert((kind, self.next_id));
        self.next_id
    }

    fn free(&mut self, kind: &'static str, id: usize) -> Result<(), ResourceError> {
        if self.live.remove(&(kind, id)) {
            Ok(())
        } else {
            Err(ResourceError::InvalidHandle { kind, id })
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    log: Rc<RefCell<DeviceLog>>,
}

impl RecordingDevice {
    /// Returns the device and a handle to its log that outlives it.
    pub fn new() -> (Self, Rc<RefCell<DeviceLog>>) {
        let device = Self::default();
        let log = Rc::clone(&device.log);
        (device, log)
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().calls.push(call);
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_buffer(
        &mut self,
        _descriptor: &BufferDescriptor,
        _data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        let id = BufferId(self.log.borrow_mut().allocate("buffer"));
        self.record(Call::CreateBuffer(id));
        Ok(id)
    }

    fn update_buffer(&mut self, id: BufferId, _data: &[u8]) -> Result<(), ResourceError> {
        if !self.log.borrow().live.contains(&("buffer", id.0)) {
            return Err(ResourceError::InvalidHandle {
                kind: "buffer",
                id: id.0,
            });
        }
        self.record(Call::UpdateBuffer(id));
        Ok(())
    }

    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError> {
        self.record(Call::DestroyBuffer(id));
        self.log.borrow_mut().free("buffer", id.0)
    }

    fn create_vertex_array(
        &mut self,
        descriptor: &VertexArrayDescriptor,
    ) -> Result<VertexArrayId, ResourceError> {
        let buffers = std::iter::once(descriptor.vertex_buffer).chain(descriptor.index_buffer);
        for buffer in buffers {
            if !self.log.borrow().live.contains(&("buffer", buffer.0)) {
                return Err(ResourceError::InvalidHandle {
                    kind: "buffer",
                    id: buffer.0,
                });
            }
        }
        let id = VertexArrayId(self.log.borrow_mut().allocate("vertex array"));
        self.record(Call::CreateVertexArray(id));
        Ok(id)
    }

    fn destroy_vertex_array(&mut self, id: VertexArrayId) -> Result<(), ResourceError> {
        self.record(Call::DestroyVertexArray(id));
        self.log.borrow_mut().free("vertex array", id.0)
    }

    fn create_texture(
        &mut self,
        _descriptor: &TextureDescriptor,
        _data: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError> {
        let id = TextureId(self.log.borrow_mut().allocate("texture"));
        self.record(Call::CreateTexture(id));
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) -> Result<(), ResourceError> {
        self.record(Call::DestroyTexture(id));
        self.log.borrow_mut().free("texture", id.0)
    }

    fn create_shader_module(
        &mut self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderId, ShaderError> {
        if self.log.borrow().fail_compile == Some(descriptor.stage) {
            return Err(ShaderError::CompilationFailed {
                label: descriptor.label.as_deref().unwrap_or("unnamed").to_string(),
                stage: descriptor.stage,
                log: "0:1: error: unexpected token".to_string(),
            });
        }
        let id = ShaderId(self.log.borrow_mut().allocate("shader"));
        self.record(Call::CreateShader(id));
        Ok(id)
    }

    fn destroy_shader_module(&mut self, id: ShaderId) -> Result<(), ResourceError> {
        self.record(Call::DestroyShader(id));
        self.log.borrow_mut().free("shader", id.0)
    }

    fn create_program(&mut self, descriptor: &ProgramDescriptor) -> Result<ProgramId, ShaderError> {
        if self.log.borrow().fail_link {
            return Err(ShaderError::LinkFailed {
                label: descriptor.label.as_deref().unwrap_or("unnamed").to_string(),
                log: "error: varying mismatch".to_string(),
            });
        }
        let id = ProgramId(self.log.borrow_mut().allocate("program"));
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn destroy_program(&mut self, id: ProgramId) -> Result<(), ResourceError> {
        self.record(Call::DestroyProgram(id));
        self.log.borrow_mut().free("program", id.0)
    }

    fn uniform_location(&mut self, _program: ProgramId, name: &str) -> Option<UniformLocation> {
        let mut log = self.log.borrow_mut();
        log.uniform_names.push(name.to_string());
        Some(UniformLocation(log.uniform_names.len() - 1))
    }

    fn create_framebuffer(
        &mut self,
        descriptor: &FramebufferDescriptor,
    ) -> Result<FramebufferId, ResourceError> {
        if self.log.borrow().incomplete_framebuffer {
            return Err(ResourceError::IncompleteFramebuffer {
                label: descriptor.label.as_deref().unwrap_or("unnamed").to_string(),
                status: 0x8cd6,
            });
        }
        let id = FramebufferId(self.log.borrow_mut().allocate("framebuffer"));
        self.record(Call::CreateFramebuffer(id));
        Ok(id)
    }

    fn destroy_framebuffer(&mut self, id: FramebufferId) -> Result<(), ResourceError> {
        self.record(Call::DestroyFramebuffer(id));
        self.log.borrow_mut().free("framebuffer", id.0)
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) {
        self.record(Call::BindFramebuffer(framebuffer));
    }

    fn set_viewport(&mut self, _x: i32, _y: i32, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.record(Call::DepthTest(enabled));
    }

    fn clear(&mut self, color: Option<Vec4>, depth: bool) {
        self.record(Call::Clear(color, depth));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.record(Call::UseProgram(program));
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let name = self.log.borrow().uniform_names[location.0].clone();
        self.record(Call::SetUniform(name, value));
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>) {
        self.record(Call::BindTexture(unit, texture));
    }

    fn draw_elements(
        &mut self,
        vertex_array: VertexArrayId,
        topology: PrimitiveTopology,
        index_count: u32,
    ) {
        self.record(Call::DrawElements(vertex_array, topology, index_count));
    }

    fn draw_arrays(
        &mut self,
        vertex_array: VertexArrayId,
        topology: PrimitiveTopology,
        vertex_count: u32,
    ) {
        self.record(Call::DrawArrays(vertex_array, topology, vertex_count));
    }
}

// --- Scene helpers ---

pub fn quad_mesh() -> AssetHandle<Mesh> {
    let corners = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ];
    let vertices = corners
        .iter()
        .map(|&p| Vertex::new(p, Vec3::Z, Vec2::new(p.x * 0.5 + 0.5, p.y * 0.5 + 0.5)))
        .collect();
    AssetHandle::new(Mesh::new(vertices, vec![[0, 1, 2], [0, 2, 3]]))
}

pub fn pixel_texture() -> AssetHandle<Texture2D> {
    AssetHandle::new(
        Texture2D::with_data(
            1,
            1,
            TextureFormat::Rgba8,
            TextureWrap::Repeat,
            true,
            vec![255, 0, 0, 255],
        )
        .expect("one RGBA pixel"),
    )
}

pub fn textured_model(
    mesh: AssetHandle<Mesh>,
    diffuse_map: Option<AssetHandle<Texture2D>>,
) -> Model {
    let material = Material {
        diffuse_map,
        ..Default::default()
    };
    Model::new("model", Some(mesh), glam::Mat4::IDENTITY, material)
}
