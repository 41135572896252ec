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

/// Distance fog blending a linear ramp with an exponential falloff.
///
/// Fragments are mixed toward [`color`](Self::color) by `1 - visibility(d)`,
/// where `d` is the view space distance of the fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogLinear {
    /// Color distant fragments fade to.
    pub color: Vec3,
    /// Distance where the linear ramp starts.
    pub near: f32,
    /// Distance where the linear ramp is fully fogged.
    pub far: f32,
    /// Weight of the linear ramp.
    pub linear_factor: f32,
    /// Weight of the exponential falloff.
    pub exponential_factor: f32,
    /// Distance scale of the exponential falloff.
    pub exponential_attenuation_factor: f32,
    /// Exponent applied to the scaled distance.
    pub exponential_power: f32,
}

impl Default for FogLinear {
    fn default() -> Self {
        Self {
            color: Vec3::ZERO,
            near: 1.0,
            far: 100.0,
            linear_factor: 1.0,
            exponential_factor: 0.0,
            exponential_attenuation_factor: 50.0,
            exponential_power: 1.0,
        }
    }
}

impl FogLinear {
    /// A purely linear fog between `near` and `far`.
    pub fn new(color: Vec3, near: f32, far: f32) -> Self {
        Self {
            color,
            near,
            far,
            ..Default::default()
        }
    }

    /// Fraction of the fragment color kept at `distance`, in `[0, 1]`.
    ///
    /// Matches the evaluation in the built-in standard fragment shader.
    pub fn visibility(&self, distance: f32) -> f32 {
        let linear = if self.far > self.near {
            ((self.far - distance) / (self.far - self.near)).clamp(0.0, 1.0)
        } else if distance < self.far {
            1.0
        } else {
            0.0
        };
        let attenuation = self.exponential_attenuation_factor.max(f32::EPSILON);
        let exponential = (-(distance.max(0.0) / attenuation).powf(self.exponential_power)).exp();
        (1.0 - self.linear_factor * (1.0 - linear) - self.exponential_factor * (1.0 - exponential))
            .clamp(0.0, 1.0)
    }
}
