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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::api::ShaderStage;
use thiserror::Error;

/// An error raised while compiling or linking GPU programs.
#[derive(Debug, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("{stage} shader '{label}' failed to compile: {log}")]
    CompilationFailed {
        /// A descriptive label for the shader.
        label: String,
        /// The stage being compiled.
        stage: ShaderStage,
        /// The driver's compiler log.
        log: String,
    },
    /// Compiled stages failed to link into a program.
    #[error("program '{label}' failed to link: {log}")]
    LinkFailed {
        /// A descriptive label for the program.
        label: String,
        /// The driver's linker log.
        log: String,
    },
}

/// An error related to the creation or use of GPU resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A shader-related error occurred.
    #[error(transparent)]
    Shader(#[from] ShaderError),
    /// The driver refused to create an object.
    #[error("failed to create {kind}: {details}")]
    CreationFailed {
        /// Kind of object, e.g. `"buffer"`.
        kind: &'static str,
        /// Message reported by the backend.
        details: String,
    },
    /// A framebuffer was assembled but the driver reports it unusable.
    #[error("framebuffer '{label}' is incomplete (status {status:#06x})")]
    IncompleteFramebuffer {
        /// A descriptive label for the framebuffer.
        label: String,
        /// The backend status code.
        status: u32,
    },
    /// A handle did not refer to a live object.
    #[error("invalid {kind} handle {id}")]
    InvalidHandle {
        /// Kind of object, e.g. `"texture"`.
        kind: &'static str,
        /// Raw handle value.
        id: usize,
    },
}
