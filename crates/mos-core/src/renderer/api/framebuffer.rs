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

//! Defines data structures for off-screen framebuffers.

use super::TextureId;
use std::borrow::Cow;

/// A descriptor used to create a [`FramebufferId`].
///
/// The device attaches `color` and, when `depth` is set, creates a depth
/// renderbuffer whose lifetime is bound to the framebuffer.
#[derive(Debug, Clone)]
pub struct FramebufferDescriptor<'a> {
    /// An optional debug label for the framebuffer.
    pub label: Option<Cow<'a, str>>,
    /// Texture used as color attachment 0.
    pub color: TextureId,
    /// Width in pixels, matching the color attachment.
    pub width: u32,
    /// Height in pixels, matching the color attachment.
    pub height: u32,
    /// Whether to attach a depth renderbuffer.
    pub depth: bool,
}

/// An opaque handle to a framebuffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub usize);
