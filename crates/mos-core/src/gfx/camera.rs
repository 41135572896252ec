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

use glam::{Mat4, Vec3};

/// View and projection used to render a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World to view transform.
    pub view: Mat4,
    /// View to clip transform.
    pub projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl Camera {
    /// A camera at `position` looking at `center`.
    pub fn new(position: Vec3, center: Vec3, projection: Mat4, up: Vec3) -> Self {
        Self {
            view: Mat4::look_at_rh(position, center, up),
            projection,
        }
    }

    /// Position of the eye in world space.
    pub fn position(&self) -> Vec3 {
        self.view.inverse().w_axis.truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_position_round_trips_through_view() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let camera = Camera::new(eye, Vec3::ZERO, Mat4::IDENTITY, Vec3::Y);
        assert_relative_eq!(camera.position(), eye, epsilon = 1e-5);
    }
}
