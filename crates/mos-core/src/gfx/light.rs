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

use glam::Vec3;

/// A point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Position in world space.
    pub position: Vec3,
    /// Diffuse color.
    pub diffuse: Vec3,
    /// Specular color.
    pub specular: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
        }
    }
}

impl Light {
    /// Creates a light.
    pub fn new(position: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        Self {
            position,
            diffuse,
            specular,
        }
    }
}
