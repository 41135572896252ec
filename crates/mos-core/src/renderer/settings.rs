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

//! Global settings for the rendering system.

use crate::renderer::api::FilterMode;
use glam::Vec3;
use serde::Deserialize;

/// A collection of global settings that affect how the renderer uploads and
/// draws resources.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Initial state of the lightmap toggle.
    pub lightmaps: bool,
    /// Color used by `clear` when none is given.
    pub clear_color: Vec3,
    /// Filtering applied to every material texture.
    pub texture_filter: FilterMode,
    /// If `false`, mipmap requests on textures are ignored.
    pub generate_mipmaps: bool,
    /// Enables the depth test on the device.
    pub depth_test: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            lightmaps: true,
            clear_color: Vec3::ZERO,
            texture_filter: FilterMode::Linear,
            generate_mipmaps: true,
            depth_test: true,
        }
    }
}

impl RenderSettings {
    /// Parses settings from JSON. Missing fields keep their default value.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            RenderSettings::from_json_str(r#"{ "lightmaps": false, "texture_filter": "nearest" }"#)
                .unwrap();
        assert!(!settings.lightmaps);
        assert_eq!(settings.texture_filter, FilterMode::Nearest);
        assert!(settings.depth_test);
        assert_eq!(settings.clear_color, Vec3::ZERO);
    }

    #[test]
    fn test_clear_color_from_json() {
        let settings = RenderSettings::from_json_str(r#"{ "clear_color": [0.1, 0.2, 0.3] }"#).unwrap();
        assert_eq!(settings.clear_color, Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(RenderSettings::from_json_str("{ lightmaps: }").is_err());
    }
}
