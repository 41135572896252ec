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

//! Process-wide logger setup for applications embedding the renderer.

use anyhow::{Context, Result};
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::str::FromStr;

/// Configuration for [`init_logging`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set, in `env_logger` syntax.
    pub default_filter: String,
    /// Per-module level overrides applied on top of the filter, e.g.
    /// `("mos_render", "trace")`.
    pub module_levels: Vec<(String, String)>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_owned(),
            module_levels: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Adds a per-module level override.
    pub fn with_module_level(mut self, module: impl Into<String>, level: impl Into<String>) -> Self {
        self.module_levels.push((module.into(), level.into()));
        self
    }

    fn builder(&self) -> Result<Builder> {
        let mut builder = Builder::from_env(Env::default().default_filter_or(&self.default_filter));
        for (module, level) in &self.module_levels {
            let level = LevelFilter::from_str(level)
                .with_context(|| format!("invalid log level '{level}' for module '{module}'"))?;
            builder.filter_module(module, level);
        }
        Ok(builder)
    }
}

/// Installs `env_logger` as the global logger.
///
/// `RUST_LOG` takes precedence over [`LoggingConfig::default_filter`].
/// Calling this again once a logger is installed is a no-op.
///
/// ## Errors
/// Fails if a module override names an unknown level.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let mut builder = config.builder()?;
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized, keeping the existing one");
    }
    Ok(())
}
