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
use glam::Vec3;

/// Surface appearance of a model.
#[derive(Debug, Clone)]
pub struct Material {
    /// Base color texture.
    pub diffuse_map: Option<AssetHandle<Texture2D>>,
    /// Second base color texture, blended over the first by its alpha.
    pub diffuse_map_2: Option<AssetHandle<Texture2D>>,
    /// Tangent space normal map.
    pub normal_map: Option<AssetHandle<Texture2D>>,
    /// Precomputed lighting.
    pub light_map: Option<AssetHandle<Texture2D>>,
    /// Ambient color.
    pub ambient: Vec3,
    /// Diffuse color.
    pub diffuse: Vec3,
    /// Specular color.
    pub specular: Vec3,
    /// 0 is fully transparent, 1 fully opaque.
    pub opacity: f32,
    /// Phong exponent.
    pub specular_exponent: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_map: None,
            diffuse_map_2: None,
            normal_map: None,
            light_map: None,
            ambient: Vec3::splat(0.0),
            diffuse: Vec3::splat(1.0),
            specular: Vec3::splat(0.0),
            opacity: 1.0,
            specular_exponent: 0.0,
        }
    }
}

impl Material {
    /// Creates an untextured material.
    pub fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3, opacity: f32, specular_exponent: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            opacity,
            specular_exponent,
            ..Default::default()
        }
    }

    /// Every texture referenced by the material.
    pub fn textures(&self) -> impl Iterator<Item = &AssetHandle<Texture2D>> {
        [
            &self.diffuse_map,
            &self.diffuse_map_2,
            &self.normal_map,
            &self.light_map,
        ]
            .into_iter()
            .flatten()
    }
}
