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

use crate::asset::Asset;
use crate::id::{StableId, TEXTURE_IDS};
use crate::renderer::api::{TextureFormat, TextureWrap};

/// A two dimensional image, possibly without pixel data (render target
/// attachments).
#[derive(Debug)]
pub struct Texture2D {
    id: StableId,
    width: u32,
    height: u32,
    /// Pixel layout of `data`.
    pub format: TextureFormat,
    /// Addressing mode.
    pub wrap: TextureWrap,
    /// Whether a mipmap chain should be built on upload.
    pub mipmaps: bool,
    data: Vec<u8>,
}

impl Asset for Texture2D {}

impl Texture2D {
    /// Creates a texture without pixel data.
    pub fn new(
        width: u32,
        height: u32,
        format: TextureFormat,
        wrap: TextureWrap,
        mipmaps: bool,
    ) -> Self {
        Self {
            id: TEXTURE_IDS.next_id(),
            width,
            height,
            format,
            wrap,
            mipmaps,
            data: Vec::new(),
        }
    }

    /// Creates a texture from tightly packed pixels.
    ///
    /// Returns `None` if `data` does not hold exactly `width * height` pixels
    /// of `format`.
    pub fn with_data(
        width: u32,
        height: u32,
        format: TextureFormat,
        wrap: TextureWrap,
        mipmaps: bool,
        data: Vec<u8>,
    ) -> Option<Self> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            log::warn!(
                "Texture data is {} bytes, expected {expected} for {width}x{height} {format:?}",
                data.len()
            );
            return None;
        }
        let mut texture = Self::new(width, height, format, wrap, mipmaps);
        texture.data = data;
        Some(texture)
    }

    /// The stable id of this texture.
    pub fn id(&self) -> StableId {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel data, or `None` if the texture has none.
    pub fn data(&self) -> Option<&[u8]> {
        (!self.data.is_empty()).then_some(self.data.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_data_checks_size() {
        let ok = Texture2D::with_data(
            2,
            2,
            TextureFormat::Rgba8,
            TextureWrap::Repeat,
            false,
            vec![255; 16],
        );
        assert!(ok.is_some());

        let short = Texture2D::with_data(
            2,
            2,
            TextureFormat::Rgba8,
            TextureWrap::Repeat,
            false,
            vec![255; 15],
        );
        assert!(short.is_none());
    }

    #[test]
    fn test_empty_texture_has_no_data() {
        let texture = Texture2D::new(8, 8, TextureFormat::Srgb8, TextureWrap::ClampToEdge, false);
        assert!(texture.data().is_none());
        assert_eq!((texture.width(), texture.height()), (8, 8));
    }
}
