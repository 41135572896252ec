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

use super::Texture2D;
use crate::asset::AssetHandle;
use crate::id::{StableId, TARGET_IDS};
use crate::renderer::api::{TextureFormat, TextureWrap};

/// An off-screen destination for draws. Its color output lands in `texture`,
/// which can then be sampled by materials like any other texture.
#[derive(Debug)]
pub struct RenderTarget {
    id: StableId,
    /// The color attachment.
    pub texture: AssetHandle<Texture2D>,
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::new(256, 256)
    }
}

impl RenderTarget {
    /// Creates a target with an sRGB color attachment of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: TARGET_IDS.next_id(),
            texture: AssetHandle::new(Texture2D::new(
                width,
                height,
                TextureFormat::Srgb8,
                TextureWrap::ClampToEdge,
                false,
            )),
        }
    }

    /// The stable id of this target.
    pub fn id(&self) -> StableId {
        self.id
    }

    /// Width of the attachment.
    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    /// Height of the attachment.
    pub fn height(&self) -> u32 {
        self.texture.height()
    }
}
