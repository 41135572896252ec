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

use super::BufferId;
use std::borrow::Cow;

/// A single float attribute inside an interleaved vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location.
    pub location: u32,
    /// Number of `f32` components (1 to 4).
    pub components: u32,
    /// Byte offset from the start of the vertex.
    pub offset: u32,
}

/// Describes how one vertex is laid out in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout<'a> {
    /// Distance in bytes between consecutive vertices.
    pub stride: u32,
    /// The attributes read from each vertex.
    pub attributes: Cow<'a, [VertexAttribute]>,
}

/// A descriptor used to create a [`VertexArrayId`].
#[derive(Debug, Clone)]
pub struct VertexArrayDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Buffer holding the interleaved vertices.
    pub vertex_buffer: BufferId,
    /// Optional `u32` index buffer.
    pub index_buffer: Option<BufferId>,
    /// Layout of `vertex_buffer`.
    pub layout: VertexLayout<'a>,
}

/// An opaque handle to a vertex array object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub usize);
