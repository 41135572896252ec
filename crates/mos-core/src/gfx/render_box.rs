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

use crate::id::{StableId, SHAPE_IDS};
use glam::{Mat4, Vec3};

/// An axis-aligned box drawn as a wireframe, typically a debug bound.
#[derive(Debug)]
pub struct RenderBox {
    id: StableId,
    /// Maps the unit cube centered on the origin to the box.
    pub transform: Mat4,
}

impl RenderBox {
    /// Creates a box centered on `position` with full size `extent`.
    pub fn new(position: Vec3, extent: Vec3) -> Self {
        Self {
            id: SHAPE_IDS.next_id(),
            transform: Mat4::from_translation(position) * Mat4::from_scale(extent),
        }
    }

    /// The stable id of this box.
    pub fn id(&self) -> StableId {
        self.id
    }

    /// Center of the box.
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}
