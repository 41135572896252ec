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

//! Backend-agnostic descriptors and opaque handles used by [`GraphicsDevice`](crate::renderer::GraphicsDevice).

mod buffer;
mod draw;
mod framebuffer;
mod shader;
mod texture;
mod uniform;
mod vertex;

pub use buffer::*;
pub use draw::*;
pub use framebuffer::*;
pub use shader::*;
pub use texture::*;
pub use uniform::*;
pub use vertex::*;
