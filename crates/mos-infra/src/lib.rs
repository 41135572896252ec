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

//! Concrete backends for the engine's abstract interfaces.
//!
//! The graphics module implements [`GraphicsDevice`](mos_core::renderer::GraphicsDevice)
//! on top of an OpenGL 3.3 core context. The logging module wires the `log`
//! facade to `env_logger` for applications.

#![warn(missing_docs)]

#[cfg(feature = "graphics")]
pub mod graphics;
pub mod logging;

#[cfg(feature = "graphics")]
pub use graphics::gl::GlDevice;
pub use logging::{init_logging, LoggingConfig};
