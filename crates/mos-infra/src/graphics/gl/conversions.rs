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

use mos_core::renderer::api::{
    BufferKind, BufferUsage, FilterMode, PrimitiveTopology, ShaderStage, TextureFormat,
    TextureWrap,
};

/// A local extension trait converting engine enums into GL constants.
pub trait IntoGl<T> {
    /// Consumes self and converts it into the GL representation.
    fn into_gl(self) -> T;
}

/// The three enums `glTexImage2D` needs for one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlTextureFormat {
    pub internal: i32,
    pub format: u32,
    pub ty: u32,
}

impl IntoGl<GlTextureFormat> for TextureFormat {
    fn into_gl(self) -> GlTextureFormat {
        let (internal, format) = match self {
            TextureFormat::R8 => (glow::R8, glow::RED),
            TextureFormat::Rg8 => (glow::RG8, glow::RG),
            TextureFormat::Rgb8 => (glow::RGB8, glow::RGB),
            TextureFormat::Rgba8 => (glow::RGBA8, glow::RGBA),
            TextureFormat::Srgb8 => (glow::SRGB8, glow::RGB),
            TextureFormat::Srgb8Alpha8 => (glow::SRGB8_ALPHA8, glow::RGBA),
        };
        GlTextureFormat {
            internal: internal as i32,
            format,
            ty: glow::UNSIGNED_BYTE,
        }
    }
}

impl IntoGl<i32> for TextureWrap {
    fn into_gl(self) -> i32 {
        (match self {
            TextureWrap::Repeat => glow::REPEAT,
            TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
            TextureWrap::ClampToBorder => glow::CLAMP_TO_BORDER,
        }) as i32
    }
}

/// Returns the `(min, mag)` filter pair for a texture.
pub fn filter_pair(filter: FilterMode, mipmaps: bool) -> (i32, i32) {
    let (min, mag) = match (filter, mipmaps) {
        (FilterMode::Nearest, false) => (glow::NEAREST, glow::NEAREST),
        (FilterMode::Nearest, true) => (glow::NEAREST_MIPMAP_NEAREST, glow::NEAREST),
        (FilterMode::Linear, false) => (glow::LINEAR, glow::LINEAR),
        (FilterMode::Linear, true) => (glow::LINEAR_MIPMAP_LINEAR, glow::LINEAR),
    };
    (min as i32, mag as i32)
}

impl IntoGl<u32> for PrimitiveTopology {
    fn into_gl(self) -> u32 {
        match self {
            PrimitiveTopology::PointList => glow::POINTS,
            PrimitiveTopology::LineList => glow::LINES,
            PrimitiveTopology::TriangleList => glow::TRIANGLES,
        }
    }
}

impl IntoGl<u32> for BufferKind {
    fn into_gl(self) -> u32 {
        match self {
            BufferKind::Vertex => glow::ARRAY_BUFFER,
            BufferKind::Index => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

impl IntoGl<u32> for BufferUsage {
    fn into_gl(self) -> u32 {
        match self {
            BufferUsage::Static => glow::STATIC_DRAW,
            BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        }
    }
}

impl IntoGl<u32> for ShaderStage {
    fn into_gl(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}
