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

use crate::programs::ProgramKey;
use mos_core::renderer::{ResourceError, ShaderError};
use thiserror::Error;

/// Errors surfaced by the [`Renderer`](crate::Renderer).
#[derive(Debug, Error)]
pub enum RenderError {
    /// A GPU resource could not be created.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// No program is registered for the requested style.
    #[error("no program registered for {key}")]
    ProgramNotFound {
        /// The style that was requested.
        key: ProgramKey,
    },
    /// A program was registered twice for the same style.
    #[error("a program is already registered for {key}")]
    ProgramAlreadyRegistered {
        /// The style that was registered twice.
        key: ProgramKey,
    },
    /// The program for `key` exposes a different uniform set than the draw expects.
    #[error("program for {key} has an unexpected uniform set")]
    UnexpectedUniformSet {
        /// The style of the program.
        key: ProgramKey,
    },
}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        RenderError::Resource(err.into())
    }
}
