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

//! Off-screen framebuffers backing [`RenderTarget`]s.

use crate::resource_table::ResourceTable;
use crate::resources::log_failure;
use ahash::AHashSet;
use mos_core::gfx::RenderTarget;
use mos_core::id::StableId;
use mos_core::renderer::api::{
    FilterMode, FramebufferDescriptor, FramebufferId, TextureDescriptor, TextureId,
};
use mos_core::renderer::{GraphicsDevice, ResourceError};
use std::borrow::Cow;

/// Creates one framebuffer per render target on first use and binds it.
///
/// The color attachment is registered in the shared texture table under the
/// id of the target's texture, so materials can sample it like any other
/// texture. The depth buffer belongs to the framebuffer on the device side
/// and is never tracked here.
#[derive(Debug)]
pub struct RenderTargetManager {
    framebuffers: ResourceTable<FramebufferId>,
    attachments: AHashSet<StableId>,
}

impl Default for RenderTargetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTargetManager {
    /// Creates a manager with no framebuffer.
    pub fn new() -> Self {
        Self {
            framebuffers: ResourceTable::new("framebuffer"),
            attachments: AHashSet::new(),
        }
    }

    /// Redirects output to `target`, creating its framebuffer if needed, and
    /// sets the viewport to the target size.
    ///
    /// # Errors
    ///
    /// Fails if the texture or framebuffer cannot be created, including when
    /// the framebuffer is incomplete. Nothing is registered or leaked then.
    pub fn bind<D: GraphicsDevice>(
        &mut self,
        device: &mut D,
        textures: &mut ResourceTable<TextureId>,
        target: &RenderTarget,
    ) -> Result<FramebufferId, ResourceError> {
        let framebuffer = match self.framebuffers.get(target.id()) {
            Some(framebuffer) => framebuffer,
            None => self.create(device, textures, target)?,
        };
        device.bind_framebuffer(Some(framebuffer));
        device.set_viewport(0, 0, target.width(), target.height());
        Ok(framebuffer)
    }

    fn create<D: GraphicsDevice>(
        &mut self,
        device: &mut D,
        textures: &mut ResourceTable<TextureId>,
        target: &RenderTarget,
    ) -> Result<FramebufferId, ResourceError> {
        let label = format!("render target {}", target.id());
        let texture = &target.texture;
        let color = device.create_texture(
            &TextureDescriptor {
                label: Some(Cow::Borrowed(label.as_str())),
                width: texture.width(),
                height: texture.height(),
                format: texture.format,
                wrap: texture.wrap,
                filter: FilterMode::Nearest,
                mipmaps: false,
            },
            None,
        )?;

        let framebuffer = match device.create_framebuffer(&FramebufferDescriptor {
            label: Some(Cow::Borrowed(label.as_str())),
            color,
            width: texture.width(),
            height: texture.height(),
            depth: true,
        }) {
            Ok(framebuffer) => framebuffer,
            Err(err) => {
                log_failure(device.destroy_texture(color));
                return Err(err);
            }
        };

        if let Some(displaced) = textures.insert(texture.id(), color) {
            log_failure(device.destroy_texture(displaced));
        }
        self.attachments.insert(texture.id());
        self.framebuffers.insert(target.id(), framebuffer);
        log::debug!(
            "Created {label} ({}x{}) as {framebuffer:?}",
            texture.width(),
            texture.height()
        );
        Ok(framebuffer)
    }

    /// Destroys the framebuffer of `target` and its color attachment.
    /// Returns `false` if the target was never bound.
    pub fn release<D: GraphicsDevice>(
        &mut self,
        device: &mut D,
        textures: &mut ResourceTable<TextureId>,
        target: &RenderTarget,
    ) -> bool {
        let released = self
            .framebuffers
            .release(target.id(), |handle| log_failure(device.destroy_framebuffer(handle)));
        if released {
            let texture = target.texture.id();
            self.attachments.remove(&texture);
            textures.release(texture, |handle| log_failure(device.destroy_texture(handle)));
        }
        released
    }

    /// Returns `true` if `texture` is the color attachment of a live framebuffer.
    pub fn owns_texture(&self, texture: StableId) -> bool {
        self.attachments.contains(&texture)
    }

    /// Returns `true` if `target` has a framebuffer.
    pub fn contains(&self, target: &RenderTarget) -> bool {
        self.framebuffers.contains(target.id())
    }

    /// Number of live framebuffers.
    pub fn len(&self) -> usize {
        self.framebuffers.len()
    }

    /// Returns `true` if no framebuffer is live.
    pub fn is_empty(&self) -> bool {
        self.framebuffers.is_empty()
    }

    /// Destroys every framebuffer. Color attachments stay in the texture
    /// table and are released with it.
    pub fn clear<D: GraphicsDevice>(&mut self, device: &mut D) {
        for (_, handle) in self.framebuffers.drain() {
            log_failure(device.destroy_framebuffer(handle));
        }
        self.attachments.clear();
    }
}
