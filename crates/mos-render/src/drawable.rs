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

use glam::{Mat4, Vec2};
use mos_core::gfx::{Camera, FogLinear, Light, Model, Particles, RenderBox, RenderTarget};

/// Anything the renderer can draw.
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    /// A model and, recursively, its children.
    Model(&'a Model),
    /// A particle system.
    Particles(&'a Particles),
    /// A wireframe box.
    Box(&'a RenderBox),
}

impl<'a> From<&'a Model> for Drawable<'a> {
    fn from(model: &'a Model) -> Self {
        Drawable::Model(model)
    }
}

impl<'a> From<&'a Particles> for Drawable<'a> {
    fn from(particles: &'a Particles) -> Self {
        Drawable::Particles(particles)
    }
}

impl<'a> From<&'a RenderBox> for Drawable<'a> {
    fn from(render_box: &'a RenderBox) -> Self {
        Drawable::Box(render_box)
    }
}

/// Per-frame state shared by every draw.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// World to view transform.
    pub view: Mat4,
    /// View to clip transform.
    pub projection: Mat4,
    /// The light affecting lit models.
    pub light: Light,
    /// Distance fog applied to model draws. `None` disables it.
    pub fog: Option<FogLinear>,
    /// Size of the default framebuffer.
    ///
    /// A zero size leaves the viewport alone when drawing to the default
    /// framebuffer, so after drawing into a render target the viewport still
    /// has the target's size. Set a resolution whenever targets are in use.
    pub resolution: Vec2,
    /// Where output goes. `None` draws to the default framebuffer.
    pub target: Option<&'a RenderTarget>,
}

impl<'a> RenderContext<'a> {
    /// A context drawing to the default framebuffer with a default light.
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view,
            projection,
            light: Light::default(),
            fog: None,
            resolution: Vec2::ZERO,
            target: None,
        }
    }

    /// A context using the camera's view and projection.
    pub fn from_camera(camera: &Camera) -> Self {
        Self::new(camera.view, camera.projection)
    }

    /// Sets the light.
    pub fn with_light(mut self, light: Light) -> Self {
        self.light = light;
        self
    }

    /// Enables distance fog.
    pub fn with_fog(mut self, fog: FogLinear) -> Self {
        self.fog = Some(fog);
        self
    }

    /// Sets the default framebuffer size.
    pub fn with_resolution(mut self, resolution: Vec2) -> Self {
        self.resolution = resolution;
        self
    }

    /// Redirects output to `target`.
    pub fn with_target(mut self, target: &'a RenderTarget) -> Self {
        self.target = Some(target);
        self
    }
}
