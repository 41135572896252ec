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

//! Defines data structures related to GPU texture resources.

use serde::Deserialize;
use std::borrow::Cow;

/// The pixel layout of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    /// One 8-bit channel.
    R8,
    /// Two 8-bit channels.
    Rg8,
    /// Three 8-bit channels.
    Rgb8,
    /// Four 8-bit channels.
    Rgba8,
    /// Three 8-bit channels in sRGB space.
    Srgb8,
    /// Four 8-bit channels, color in sRGB space.
    #[default]
    Srgb8Alpha8,
}

impl TextureFormat {
    /// Size of one pixel in bytes.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::Rg8 => 2,
            TextureFormat::Rgb8 | TextureFormat::Srgb8 => 3,
            TextureFormat::Rgba8 | TextureFormat::Srgb8Alpha8 => 4,
        }
    }
}

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureWrap {
    /// Tile the texture.
    #[default]
    Repeat,
    /// Clamp to the edge texels.
    ClampToEdge,
    /// Clamp to a transparent border.
    ClampToBorder,
}

/// Texel filtering used when minifying or magnifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Nearest texel.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Linear,
}

/// A descriptor used to create a [`TextureId`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label for the texture.
    pub label: Option<Cow<'a, str>>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub format: TextureFormat,
    /// Addressing mode for both axes.
    pub wrap: TextureWrap,
    /// Filtering for both minification and magnification.
    pub filter: FilterMode,
    /// Whether a mipmap chain should be generated after upload.
    pub mipmaps: bool,
}

/// An opaque handle to a GPU texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);
