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

//! Compiled programs and their uniform slots, one per visual style.

use crate::error::RenderError;
use crate::resources::log_failure;
use ahash::AHashMap;
use mos_core::gfx::ModelShader;
use mos_core::renderer::api::{
    ProgramDescriptor, ProgramId, ShaderModuleDescriptor, ShaderStage, UniformLocation,
};
use mos_core::renderer::GraphicsDevice;
use std::borrow::Cow;
use std::fmt;

/// Identifies which program a drawable is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKey {
    /// Models, one program per [`ModelShader`].
    Model(ModelShader),
    /// Point sprite particle systems.
    Particles,
    /// Wireframe boxes.
    Box,
}

impl fmt::Display for ProgramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramKey::Model(ModelShader::Standard) => f.write_str("standard"),
            ProgramKey::Model(ModelShader::Text) => f.write_str("text"),
            ProgramKey::Particles => f.write_str("particles"),
            ProgramKey::Box => f.write_str("box"),
        }
    }
}

/// Uniform slots of the model programs.
///
/// A `None` slot is one the driver optimized away; writes to it are skipped.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardUniforms {
    pub mvp: Option<UniformLocation>,
    pub mv: Option<UniformLocation>,
    pub normal_matrix: Option<UniformLocation>,
    pub texture: Option<UniformLocation>,
    pub texture2: Option<UniformLocation>,
    pub lightmap: Option<UniformLocation>,
    pub normalmap: Option<UniformLocation>,
    pub material_ambient_color: Option<UniformLocation>,
    pub material_diffuse_color: Option<UniformLocation>,
    pub material_specular_color: Option<UniformLocation>,
    pub material_specular_exponent: Option<UniformLocation>,
    pub opacity: Option<UniformLocation>,
    pub light_position: Option<UniformLocation>,
    pub light_diffuse_color: Option<UniformLocation>,
    pub light_specular_color: Option<UniformLocation>,
    pub has_texture: Option<UniformLocation>,
    pub has_texture2: Option<UniformLocation>,
    pub has_lightmap: Option<UniformLocation>,
    pub has_normalmap: Option<UniformLocation>,
    pub has_material: Option<UniformLocation>,
    pub receives_light: Option<UniformLocation>,
    pub resolution: Option<UniformLocation>,
    pub has_fog: Option<UniformLocation>,
    pub fog_color: Option<UniformLocation>,
    pub fog_near: Option<UniformLocation>,
    pub fog_far: Option<UniformLocation>,
    pub fog_linear_factor: Option<UniformLocation>,
    pub fog_exponential_factor: Option<UniformLocation>,
    pub fog_exponential_attenuation_factor: Option<UniformLocation>,
    pub fog_exponential_power: Option<UniformLocation>,
}

impl StandardUniforms {
    fn resolve<D: GraphicsDevice>(device: &mut D, program: ProgramId) -> Self {
        let mut lookup = |name: &str| device.uniform_location(program, name);
        Self {
            mvp: lookup("model_view_projection"),
            mv: lookup("model_view"),
            normal_matrix: lookup("normal_matrix"),
            texture: lookup("texture_sampler"),
            texture2: lookup("texture2_sampler"),
            lightmap: lookup("lightmap_sampler"),
            normalmap: lookup("normalmap_sampler"),
            material_ambient_color: lookup("material_ambient_color"),
            material_diffuse_color: lookup("material_diffuse_color"),
            material_specular_color: lookup("material_specular_color"),
            material_specular_exponent: lookup("material_specular_exponent"),
            opacity: lookup("opacity"),
            light_position: lookup("light_position"),
            light_diffuse_color: lookup("light_diffuse_color"),
            light_specular_color: lookup("light_specular_color"),
            has_texture: lookup("has_texture"),
            has_texture2: lookup("has_texture2"),
            has_lightmap: lookup("has_lightmap"),
            has_normalmap: lookup("has_normalmap"),
            has_material: lookup("has_material"),
            receives_light: lookup("receives_light"),
            resolution: lookup("resolution"),
            has_fog: lookup("has_fog"),
            fog_color: lookup("fog_color"),
            fog_near: lookup("fog_near"),
            fog_far: lookup("fog_far"),
            fog_linear_factor: lookup("fog_linear_factor"),
            fog_exponential_factor: lookup("fog_exponential_factor"),
            fog_exponential_attenuation_factor: lookup("fog_exponential_attenuation_factor"),
            fog_exponential_power: lookup("fog_exponential_power"),
        }
    }
}

/// Uniform slots of the particle and box programs.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimpleUniforms {
    pub mvp: Option<UniformLocation>,
    pub mv: Option<UniformLocation>,
}

impl SimpleUniforms {
    fn resolve<D: GraphicsDevice>(device: &mut D, program: ProgramId) -> Self {
        Self {
            mvp: device.uniform_location(program, "model_view_projection"),
            mv: device.uniform_location(program, "model_view"),
        }
    }
}

/// The uniform set a program exposes, decided by its [`ProgramKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramUniforms {
    /// Model programs.
    Standard(Box<StandardUniforms>),
    /// Particle and box programs.
    Simple(SimpleUniforms),
}

/// A linked program and its resolved uniforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramData {
    /// The driver program.
    pub program: ProgramId,
    /// Uniform slots resolved at link time.
    pub uniforms: ProgramUniforms,
}

/// Owns every linked program. Programs are registered once at renderer
/// start-up and live until the registry is cleared.
#[derive(Debug, Default)]
pub struct ProgramRegistry {
    programs: AHashMap<ProgramKey, ProgramData>,
}

impl ProgramRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles, links and registers the program for `key`.
    ///
    /// Shader modules are released once linked, whether linking succeeded or not.
    ///
    /// # Errors
    ///
    /// * [`RenderError::ProgramAlreadyRegistered`] if `key` already has a program.
    /// * [`RenderError::Resource`] wrapping the compiler or linker log.
    pub fn add_program<D: GraphicsDevice>(
        &mut self,
        device: &mut D,
        key: ProgramKey,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<(), RenderError> {
        if self.programs.contains_key(&key) {
            return Err(RenderError::ProgramAlreadyRegistered { key });
        }

        let label = key.to_string();
        let vertex = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some(Cow::Borrowed(label.as_str())),
            stage: ShaderStage::Vertex,
            source: Cow::Borrowed(vertex_source),
        })?;
        let fragment = match device.create_shader_module(&ShaderModuleDescriptor {
            label: Some(Cow::Borrowed(label.as_str())),
            stage: ShaderStage::Fragment,
            source: Cow::Borrowed(fragment_source),
        }) {
            Ok(fragment) => fragment,
            Err(err) => {
                log_failure(device.destroy_shader_module(vertex));
                return Err(err.into());
            }
        };

        let linked = device.create_program(&ProgramDescriptor {
            label: Some(Cow::Borrowed(label.as_str())),
            vertex,
            fragment,
        });
        log_failure(device.destroy_shader_module(vertex));
        log_failure(device.destroy_shader_module(fragment));
        let program = linked?;

        let uniforms = match key {
            ProgramKey::Model(_) => {
                ProgramUniforms::Standard(Box::new(StandardUniforms::resolve(device, program)))
            }
            ProgramKey::Particles | ProgramKey::Box => {
                ProgramUniforms::Simple(SimpleUniforms::resolve(device, program))
            }
        };

        log::debug!("Linked {label} program as {program:?}");
        self.programs.insert(key, ProgramData { program, uniforms });
        Ok(())
    }

    /// Returns the program registered for `key`.
    ///
    /// # Errors
    ///
    /// [`RenderError::ProgramNotFound`] if nothing was registered for `key`.
    pub fn program_for(&self, key: ProgramKey) -> Result<&ProgramData, RenderError> {
        self.programs
            .get(&key)
            .ok_or(RenderError::ProgramNotFound { key })
    }

    /// Number of registered programs.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Destroys every program.
    pub fn clear<D: GraphicsDevice>(&mut self, device: &mut D) {
        for (key, data) in self.programs.drain() {
            log::debug!("Destroying {key} program");
            log_failure(device.destroy_program(data.program));
        }
    }
}
