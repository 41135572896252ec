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

use super::{Material, Mesh};
use crate::asset::AssetHandle;
use crate::id::{StableId, MODEL_IDS};
use glam::{Mat4, Vec3};

/// The program family a model is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelShader {
    /// Lit, textured geometry.
    #[default]
    Standard,
    /// Glyph quads sampling a font atlas.
    Text,
}

/// A node of the scene hierarchy.
///
/// A model may carry no mesh, in which case it only groups its children.
/// Children are drawn after their parent, in insertion order, with the
/// parent's transform applied first.
///
/// Each model node has its own id, which the renderer uses to count who
/// still references a shared mesh or texture. A clone is a new node and gets
/// a fresh id.
#[derive(Debug)]
pub struct Model {
    id: StableId,
    /// Informational name.
    pub name: String,
    /// Geometry, shared between models.
    pub mesh: Option<AssetHandle<Mesh>>,
    /// Surface appearance.
    pub material: Material,
    /// Local transform relative to the parent.
    pub transform: Mat4,
    /// Program family.
    pub shader: ModelShader,
    /// Whether dynamic lighting affects this model.
    pub receives_light: bool,
    /// Child models.
    pub models: Vec<Model>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            id: MODEL_IDS.next_id(),
            name: String::new(),
            mesh: None,
            material: Material::default(),
            transform: Mat4::IDENTITY,
            shader: ModelShader::Standard,
            receives_light: true,
            models: Vec::new(),
        }
    }
}

impl Clone for Model {
    fn clone(&self) -> Self {
        Self {
            id: MODEL_IDS.next_id(),
            name: self.name.clone(),
            mesh: self.mesh.clone(),
            material: self.material.clone(),
            transform: self.transform,
            shader: self.shader,
            receives_light: self.receives_light,
            models: self.models.clone(),
        }
    }
}

impl Model {
    /// Creates a leaf model.
    pub fn new(
        name: impl Into<String>,
        mesh: Option<AssetHandle<Mesh>>,
        transform: Mat4,
        material: Material,
    ) -> Self {
        Self {
            name: name.into(),
            mesh,
            material,
            transform,
            ..Default::default()
        }
    }

    /// Identity of this node.
    pub fn id(&self) -> StableId {
        self.id
    }

    /// Appends a child and returns `self` for chaining.
    pub fn with_child(mut self, child: Model) -> Self {
        self.models.push(child);
        self
    }

    /// Translation part of the local transform.
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// Number of models in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.models.iter().map(Model::count).sum::<usize>()
    }
}
