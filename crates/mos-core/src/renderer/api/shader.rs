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

//! Defines data structures for shader modules and linked programs.

use std::borrow::Cow;
use std::fmt;

/// The pipeline stage a shader module runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Fragment shader.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A descriptor used to compile a shader module.
///
/// The source is handed to the driver unchanged.
#[derive(Debug, Clone)]
pub struct ShaderModuleDescriptor<'a> {
    /// An optional debug label, reported in compilation errors.
    pub label: Option<Cow<'a, str>>,
    /// The stage this module is compiled for.
    pub stage: ShaderStage,
    /// The GLSL source text.
    pub source: Cow<'a, str>,
}

/// A descriptor used to link a program from compiled modules.
#[derive(Debug, Clone)]
pub struct ProgramDescriptor<'a> {
    /// An optional debug label, reported in link errors.
    pub label: Option<Cow<'a, str>>,
    /// The compiled vertex stage.
    pub vertex: ShaderId,
    /// The compiled fragment stage.
    pub fragment: ShaderId,
}

/// An opaque handle to a compiled shader module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub usize);

/// An opaque handle to a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub usize);
