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

//! The draw orchestrator.

use crate::drawable::{Drawable, RenderContext};
use crate::error::RenderError;
use crate::programs::{ProgramKey, ProgramRegistry, ProgramUniforms, SimpleUniforms, StandardUniforms};
use crate::render_target::RenderTargetManager;
use crate::resources::{log_failure, GpuResources, TextureSampling};
use crate::shaders;
use ahash::{AHashMap, AHashSet};
use glam::{Mat3, Mat4, Vec3};
use mos_core::asset::AssetHandle;
use mos_core::gfx::{Material, Model, Particles, RenderBox, RenderTarget, Texture2D};
use mos_core::id::StableId;
use mos_core::renderer::api::{
    BufferDescriptor, BufferId, BufferKind, BufferUsage, PrimitiveTopology, ProgramId, TextureId,
    UniformLocation, UniformValue, VertexArrayDescriptor, VertexArrayId, VertexAttribute,
    VertexLayout,
};
use mos_core::renderer::{GraphicsDevice, RenderSettings, ResourceError};
use std::borrow::Cow;

const DIFFUSE_UNIT: u32 = 0;
const LIGHTMAP_UNIT: u32 = 1;
const NORMALMAP_UNIT: u32 = 2;
const DIFFUSE_2_UNIT: u32 = 3;

type Users = AHashMap<StableId, AHashSet<StableId>>;

/// Corners of the unit cube centered on the origin.
const BOX_CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
];

/// The twelve cube edges as a line list.
const BOX_EDGES: [u32; 24] = [
    0, 1, 1, 2, 2, 3, 3, 0, // back face
    4, 5, 5, 6, 6, 7, 7, 4, // front face
    0, 4, 1, 5, 2, 6, 3, 7, // sides
];

const BOX_ATTRIBUTES: [VertexAttribute; 1] = [VertexAttribute {
    location: 0,
    components: 3,
    offset: 0,
}];

/// Line geometry shared by every [`RenderBox`].
#[derive(Debug, Clone, Copy)]
struct BoxGeometry {
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    vertex_array: VertexArrayId,
}

impl BoxGeometry {
    fn new<D: GraphicsDevice>(device: &mut D) -> Result<Self, ResourceError> {
        let descriptor = |kind, label| BufferDescriptor {
            label: Some(Cow::Borrowed(label)),
            kind,
            usage: BufferUsage::Static,
        };
        let vertex_buffer = device.create_buffer(
            &descriptor(BufferKind::Vertex, "box corners"),
            bytemuck::cast_slice(&BOX_CORNERS),
        )?;
        let index_buffer = match device.create_buffer(
            &descriptor(BufferKind::Index, "box edges"),
            bytemuck::cast_slice(&BOX_EDGES),
        ) {
            Ok(buffer) => buffer,
            Err(err) => {
                log_failure(device.destroy_buffer(vertex_buffer));
                return Err(err);
            }
        };
        let vertex_array = match device.create_vertex_array(&VertexArrayDescriptor {
            label: Some(Cow::Borrowed("box")),
            vertex_buffer,
            index_buffer: Some(index_buffer),
            layout: VertexLayout {
                stride: std::mem::size_of::<[f32; 3]>() as u32,
                attributes: Cow::Borrowed(&BOX_ATTRIBUTES),
            },
        }) {
            Ok(vertex_array) => vertex_array,
            Err(err) => {
                log_failure(device.destroy_buffer(vertex_buffer));
                log_failure(device.destroy_buffer(index_buffer));
                return Err(err);
            }
        };
        Ok(Self {
            vertex_buffer,
            index_buffer,
            vertex_array,
        })
    }

    fn destroy<D: GraphicsDevice>(self, device: &mut D) {
        log_failure(device.destroy_vertex_array(self.vertex_array));
        log_failure(device.destroy_buffer(self.vertex_buffer));
        log_failure(device.destroy_buffer(self.index_buffer));
    }
}

/// Texture handles bound for one model draw.
#[derive(Debug, Clone, Copy, Default)]
struct MaterialTextures {
    diffuse: Option<TextureId>,
    diffuse_2: Option<TextureId>,
    normal: Option<TextureId>,
    light: Option<TextureId>,
}

/// Draws scene objects through a [`GraphicsDevice`], uploading what they
/// need the first time it is seen.
///
/// GPU copies are keyed by the [`StableId`] of the CPU resource, so a mesh
/// or texture shared by many models is uploaded once, and is released only
/// when the last model referencing it is unloaded. Nothing is released
/// implicitly between frames: callers [`unload`](Renderer::unload) what
/// leaves the scene, or call [`clear_buffers`](Renderer::clear_buffers).
/// Dropping the renderer releases everything it created.
///
/// # Examples
///
/// ```ignore
/// let mut renderer = Renderer::new(device, RenderSettings::default())?;
/// let context = RenderContext::from_camera(&camera).with_resolution(Vec2::new(1280.0, 720.0));
/// renderer.clear(Vec3::ZERO);
/// renderer.update_all(&models, Mat4::IDENTITY, &context)?;
/// ```
#[derive(Debug)]
pub struct Renderer<D: GraphicsDevice> {
    device: D,
    settings: RenderSettings,
    programs: ProgramRegistry,
    resources: GpuResources,
    targets: RenderTargetManager,
    /// Mesh id -> ids of the models drawn with it.
    mesh_users: Users,
    /// Texture id -> ids of the models referencing it.
    texture_users: Users,
    box_geometry: BoxGeometry,
    lightmaps: bool,
}

impl<D: GraphicsDevice> Renderer<D> {
    /// Links the built-in programs and creates the shared box geometry.
    ///
    /// # Errors
    ///
    /// Returns the compiler or linker log of the first program that fails,
    /// after releasing the programs already linked.
    pub fn new(mut device: D, settings: RenderSettings) -> Result<Self, RenderError> {
        device.set_depth_test(settings.depth_test);

        let mut programs = ProgramRegistry::new();
        let setup = shaders::builtin()
            .into_iter()
            .try_for_each(|(key, vertex, fragment)| {
                programs.add_program(&mut device, key, vertex, fragment)
            })
            .and_then(|()| BoxGeometry::new(&mut device).map_err(RenderError::from));
        let box_geometry = match setup {
            Ok(box_geometry) => box_geometry,
            Err(err) => {
                log::error!("Renderer initialization failed: {err}");
                programs.clear(&mut device);
                return Err(err);
            }
        };

        log::info!("Renderer initialized with {} programs", programs.len());
        Ok(Self {
            device,
            lightmaps: settings.lightmaps,
            settings,
            programs,
            resources: GpuResources::new(),
            targets: RenderTargetManager::new(),
            mesh_users: AHashMap::new(),
            texture_users: AHashMap::new(),
            box_geometry,
        })
    }

    /// The underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The underlying device, for backend specific calls.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Settings the renderer was created with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Resident meshes, textures and particle buffers.
    pub fn resources(&self) -> &GpuResources {
        &self.resources
    }

    /// Live render target framebuffers.
    pub fn targets(&self) -> &RenderTargetManager {
        &self.targets
    }

    /// Linked programs.
    pub fn programs(&self) -> &ProgramRegistry {
        &self.programs
    }

    /// Enables or disables lightmap sampling for subsequent draws.
    pub fn set_lightmaps(&mut self, enabled: bool) {
        self.lightmaps = enabled;
    }

    /// Whether lightmaps are sampled.
    pub fn lightmaps(&self) -> bool {
        self.lightmaps
    }

    /// Clears color and depth of the bound framebuffer.
    pub fn clear(&mut self, color: Vec3) {
        self.device.clear(Some(color.extend(1.0)), true);
    }

    /// Clears with the color from the settings.
    pub fn clear_default(&mut self) {
        let color = self.settings.clear_color;
        self.clear(color);
    }

    /// Uploads everything `drawable` needs without drawing it.
    pub fn load<'a>(&mut self, drawable: impl Into<Drawable<'a>>) -> Result<(), RenderError> {
        match drawable.into() {
            Drawable::Model(model) => self.load_model(model),
            Drawable::Particles(particles) => {
                self.resources.ensure_particles(&mut self.device, particles)?;
                Ok(())
            }
            Drawable::Box(_) => Ok(()),
        }
    }

    /// Loads each drawable in order.
    pub fn load_all<'a, I>(&mut self, drawables: I) -> Result<(), RenderError>
    where
        I: IntoIterator,
        I::Item: Into<Drawable<'a>>,
    {
        drawables
            .into_iter()
            .try_for_each(|drawable| self.load(drawable))
    }

    /// Releases what `drawable` owns on the GPU.
    ///
    /// Only what `drawable` uses exclusively is released: a mesh or texture
    /// stays resident while another loaded model still references it, and
    /// render target attachments are only released with their target.
    pub fn unload<'a>(&mut self, drawable: impl Into<Drawable<'a>>) {
        match drawable.into() {
            Drawable::Model(model) => self.unload_model(model),
            Drawable::Particles(particles) => {
                self.resources.release_shape(&mut self.device, particles.id());
            }
            Drawable::Box(_) => {}
        }
    }

    /// Unloads each drawable in order.
    pub fn unload_all<'a, I>(&mut self, drawables: I)
    where
        I: IntoIterator,
        I::Item: Into<Drawable<'a>>,
    {
        for drawable in drawables {
            self.unload(drawable);
        }
    }

    /// Uploads a texture on its own, for example a font atlas.
    pub fn load_texture(&mut self, texture: &Texture2D) -> Result<TextureId, RenderError> {
        let sampling = self.sampling();
        Ok(self
            .resources
            .ensure_texture(&mut self.device, texture, sampling)?)
    }

    /// Releases a texture regardless of the meshes using it. Render target
    /// attachments are left alone.
    pub fn unload_texture(&mut self, texture: &Texture2D) {
        if self.targets.owns_texture(texture.id()) {
            log::warn!("Texture {} is a render target attachment, not unloading", texture.id());
            return;
        }
        self.texture_users.remove(&texture.id());
        self.resources.release_texture(&mut self.device, texture.id());
    }

    /// Redirects output to `target`, creating its framebuffer on first use.
    pub fn render_target(&mut self, target: &RenderTarget) -> Result<(), RenderError> {
        self.targets
            .bind(&mut self.device, &mut self.resources.textures, target)?;
        Ok(())
    }

    /// Releases the framebuffer and color attachment of `target`.
    pub fn unload_target(&mut self, target: &RenderTarget) {
        self.targets
            .release(&mut self.device, &mut self.resources.textures, target);
    }

    /// Releases every uploaded resource. Programs stay linked.
    pub fn clear_buffers(&mut self) {
        self.targets.clear(&mut self.device);
        self.resources.clear(&mut self.device);
        self.mesh_users.clear();
        self.texture_users.clear();
        log::debug!("Released all GPU buffers");
    }

    /// Draws `drawable`, with `parent_transform` applied before its own.
    ///
    /// # Errors
    ///
    /// Fails if a resource cannot be uploaded or a render target cannot be
    /// created. Draws issued before the failure are not rolled back.
    pub fn update<'a>(
        &mut self,
        drawable: impl Into<Drawable<'a>>,
        parent_transform: Mat4,
        context: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        match drawable.into() {
            Drawable::Model(model) => self.update_model(model, parent_transform, context),
            Drawable::Particles(particles) => {
                self.update_particles(particles, parent_transform, context)
            }
            Drawable::Box(render_box) => self.update_box(render_box, parent_transform, context),
        }
    }

    /// Draws each drawable in order with the same transform and context.
    pub fn update_all<'a, I>(
        &mut self,
        drawables: I,
        parent_transform: Mat4,
        context: &RenderContext<'_>,
    ) -> Result<(), RenderError>
    where
        I: IntoIterator,
        I::Item: Into<Drawable<'a>>,
    {
        drawables
            .into_iter()
            .try_for_each(|drawable| self.update(drawable, parent_transform, context))
    }

    fn update_model(
        &mut self,
        model: &Model,
        parent_transform: Mat4,
        context: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let transform = parent_transform * model.transform;

        if let Some(mesh) = &model.mesh {
            let (program, uniforms) = self.standard_program(ProgramKey::Model(model.shader))?;
            let geometry = self.resources.ensure_mesh(&mut self.device, mesh)?;
            add_user(&mut self.mesh_users, mesh.id(), model.id());
            let textures = self.ensure_material(&model.material, model.id())?;
            self.bind_output(context)?;

            self.device.use_program(program);
            let lightmaps = self.lightmaps;
            write_model_uniforms(
                &mut self.device,
                &uniforms,
                model,
                transform,
                textures,
                context,
                lightmaps,
            );
            log::trace!("Drawing model '{}' ({} indices)", model.name, geometry.index_count);
            self.device.draw_elements(
                geometry.vertex_array,
                PrimitiveTopology::TriangleList,
                geometry.index_count,
            );
        }

        for child in &model.models {
            self.update_model(child, transform, context)?;
        }
        Ok(())
    }

    fn update_particles(
        &mut self,
        particles: &Particles,
        parent_transform: Mat4,
        context: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let (program, uniforms) = self.simple_program(ProgramKey::Particles)?;
        let vertex_array = self.resources.ensure_particles(&mut self.device, particles)?;
        if particles.is_empty() {
            return Ok(());
        }
        self.bind_output(context)?;

        self.device.use_program(program);
        write_simple_uniforms(&mut self.device, &uniforms, parent_transform, context);
        self.device.draw_arrays(
            vertex_array,
            PrimitiveTopology::PointList,
            particles.len() as u32,
        );
        Ok(())
    }

    fn update_box(
        &mut self,
        render_box: &RenderBox,
        parent_transform: Mat4,
        context: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let (program, uniforms) = self.simple_program(ProgramKey::Box)?;
        self.bind_output(context)?;

        self.device.use_program(program);
        write_simple_uniforms(
            &mut self.device,
            &uniforms,
            parent_transform * render_box.transform,
            context,
        );
        self.device.draw_elements(
            self.box_geometry.vertex_array,
            PrimitiveTopology::LineList,
            BOX_EDGES.len() as u32,
        );
        Ok(())
    }

    fn load_model(&mut self, model: &Model) -> Result<(), RenderError> {
        if let Some(mesh) = &model.mesh {
            self.resources.ensure_mesh(&mut self.device, mesh)?;
            add_user(&mut self.mesh_users, mesh.id(), model.id());
        }
        self.ensure_material(&model.material, model.id())?;
        model
            .models
            .iter()
            .try_for_each(|child| self.load_model(child))
    }

    fn unload_model(&mut self, model: &Model) {
        let user = model.id();
        if let Some(mesh) = &model.mesh {
            if remove_user(&mut self.mesh_users, mesh.id(), user) {
                self.resources.release_shape(&mut self.device, mesh.id());
            } else {
                log::trace!("Mesh {} still referenced, keeping it", mesh.id());
            }
        }
        for texture in model.material.textures() {
            self.release_texture_use(texture.id(), user);
        }
        for child in &model.models {
            self.unload_model(child);
        }
    }

    /// Drops `user` from the texture's users and releases the texture once
    /// nobody is left. Attachments stay with their render target.
    fn release_texture_use(&mut self, texture: StableId, user: StableId) {
        let unused = remove_user(&mut self.texture_users, texture, user);
        if unused && !self.targets.owns_texture(texture) {
            self.resources.release_texture(&mut self.device, texture);
        }
    }

    fn ensure_material(
        &mut self,
        material: &Material,
        user: StableId,
    ) -> Result<MaterialTextures, ResourceError> {
        Ok(MaterialTextures {
            diffuse: self.ensure_map(material.diffuse_map.as_ref(), user)?,
            diffuse_2: self.ensure_map(material.diffuse_map_2.as_ref(), user)?,
            normal: self.ensure_map(material.normal_map.as_ref(), user)?,
            light: self.ensure_map(material.light_map.as_ref(), user)?,
        })
    }

    fn ensure_map(
        &mut self,
        texture: Option<&AssetHandle<Texture2D>>,
        user: StableId,
    ) -> Result<Option<TextureId>, ResourceError> {
        let Some(texture) = texture else {
            return Ok(None);
        };
        let sampling = self.sampling();
        let handle = self
            .resources
            .ensure_texture(&mut self.device, texture, sampling)?;
        add_user(&mut self.texture_users, texture.id(), user);
        Ok(Some(handle))
    }

    fn bind_output(&mut self, context: &RenderContext<'_>) -> Result<(), ResourceError> {
        match context.target {
            Some(target) => {
                self.targets
                    .bind(&mut self.device, &mut self.resources.textures, target)?;
            }
            None => {
                self.device.bind_framebuffer(None);
                let resolution = context.resolution;
                if resolution.x > 0.0 && resolution.y > 0.0 {
                    self.device
                        .set_viewport(0, 0, resolution.x as u32, resolution.y as u32);
                }
            }
        }
        Ok(())
    }

    fn standard_program(
        &self,
        key: ProgramKey,
    ) -> Result<(ProgramId, StandardUniforms), RenderError> {
        let data = self.programs.program_for(key)?;
        match &data.uniforms {
            ProgramUniforms::Standard(uniforms) => Ok((data.program, **uniforms)),
            ProgramUniforms::Simple(_) => Err(RenderError::UnexpectedUniformSet { key }),
        }
    }

    fn simple_program(
        &self,
        key: ProgramKey,
    ) -> Result<(ProgramId, SimpleUniforms), RenderError> {
        let data = self.programs.program_for(key)?;
        match &data.uniforms {
            ProgramUniforms::Simple(uniforms) => Ok((data.program, *uniforms)),
            ProgramUniforms::Standard(_) => Err(RenderError::UnexpectedUniformSet { key }),
        }
    }

    fn sampling(&self) -> TextureSampling {
        TextureSampling {
            filter: self.settings.texture_filter,
            mipmaps: self.settings.generate_mipmaps,
        }
    }
}

impl<D: GraphicsDevice> Drop for Renderer<D> {
    fn drop(&mut self) {
        self.clear_buffers();
        self.programs.clear(&mut self.device);
        self.box_geometry.destroy(&mut self.device);
        log::info!("Renderer shut down");
    }
}

fn add_user(users: &mut Users, resource: StableId, user: StableId) {
    users.entry(resource).or_default().insert(user);
}

/// Removes `user` from the users of `resource`. Returns `true` when nobody
/// references the resource anymore.
fn remove_user(users: &mut Users, resource: StableId, user: StableId) -> bool {
    let Some(set) = users.get_mut(&resource) else {
        return true;
    };
    set.remove(&user);
    if set.is_empty() {
        users.remove(&resource);
        true
    } else {
        false
    }
}

fn set_uniform<D: GraphicsDevice>(
    device: &mut D,
    location: Option<UniformLocation>,
    value: impl Into<UniformValue>,
) {
    if let Some(location) = location {
        device.set_uniform(location, value.into());
    }
}

/// Binds `texture` to `unit` and reports its presence through `flag`.
fn bind_map<D: GraphicsDevice>(
    device: &mut D,
    unit: u32,
    sampler: Option<UniformLocation>,
    flag: Option<UniformLocation>,
    texture: Option<TextureId>,
) {
    device.bind_texture(unit, texture);
    set_uniform(device, sampler, unit as i32);
    set_uniform(device, flag, texture.is_some());
}

fn write_simple_uniforms<D: GraphicsDevice>(
    device: &mut D,
    uniforms: &SimpleUniforms,
    transform: Mat4,
    context: &RenderContext<'_>,
) {
    let mv = context.view * transform;
    set_uniform(device, uniforms.mvp, context.projection * mv);
    set_uniform(device, uniforms.mv, mv);
}

fn write_model_uniforms<D: GraphicsDevice>(
    device: &mut D,
    uniforms: &StandardUniforms,
    model: &Model,
    transform: Mat4,
    textures: MaterialTextures,
    context: &RenderContext<'_>,
    lightmaps: bool,
) {
    let mv = context.view * transform;
    let linear = Mat3::from_mat4(mv);
    let normal_matrix = if linear.determinant().abs() > f32::EPSILON {
        linear.inverse().transpose()
    } else {
        Mat3::IDENTITY
    };
    set_uniform(device, uniforms.mvp, context.projection * mv);
    set_uniform(device, uniforms.mv, mv);
    set_uniform(device, uniforms.normal_matrix, normal_matrix);

    bind_map(device, DIFFUSE_UNIT, uniforms.texture, uniforms.has_texture, textures.diffuse);
    bind_map(
        device,
        DIFFUSE_2_UNIT,
        uniforms.texture2,
        uniforms.has_texture2,
        textures.diffuse_2,
    );
    bind_map(
        device,
        LIGHTMAP_UNIT,
        uniforms.lightmap,
        uniforms.has_lightmap,
        textures.light.filter(|_| lightmaps),
    );
    bind_map(device, NORMALMAP_UNIT, uniforms.normalmap, uniforms.has_normalmap, textures.normal);

    let material = &model.material;
    set_uniform(device, uniforms.material_ambient_color, material.ambient);
    set_uniform(device, uniforms.material_diffuse_color, material.diffuse);
    set_uniform(device, uniforms.material_specular_color, material.specular);
    set_uniform(device, uniforms.material_specular_exponent, material.specular_exponent);
    set_uniform(device, uniforms.opacity, material.opacity);
    set_uniform(device, uniforms.has_material, true);

    let light = &context.light;
    set_uniform(device, uniforms.light_position, context.view.transform_point3(light.position));
    set_uniform(device, uniforms.light_diffuse_color, light.diffuse);
    set_uniform(device, uniforms.light_specular_color, light.specular);
    set_uniform(device, uniforms.receives_light, model.receives_light);
    set_uniform(device, uniforms.resolution, context.resolution);

    set_uniform(device, uniforms.has_fog, context.fog.is_some());
    if let Some(fog) = &context.fog {
        set_uniform(device, uniforms.fog_color, fog.color);
        set_uniform(device, uniforms.fog_near, fog.near);
        set_uniform(device, uniforms.fog_far, fog.far);
        set_uniform(device, uniforms.fog_linear_factor, fog.linear_factor);
        set_uniform(device, uniforms.fog_exponential_factor, fog.exponential_factor);
        set_uniform(
            device,
            uniforms.fog_exponential_attenuation_factor,
            fog.exponential_attenuation_factor,
        );
        set_uniform(device, uniforms.fog_exponential_power, fog.exponential_power);
    }
}
