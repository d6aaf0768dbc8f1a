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

use prism_control::SchedulerConfig;
use prism_systems::ModelSystemConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading or writing a [`RuntimeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid runtime config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings of a [`SceneRuntime`](crate::SceneRuntime).
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub scheduler: SchedulerConfig,
    pub models: ModelSystemConfig,
    /// Create the default directional light once the systems are initialized.
    pub create_default_light: bool,
    /// Filter passed to [`init_logging`](crate::init_logging) when `RUST_LOG`
    /// is unset.
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            models: ModelSystemConfig::default(),
            create_default_light: true,
            log_filter: "info".to_owned(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::debug!("Runtime config loaded from {}", path.display());
        Ok(config)
    }

    /// Writes the config as pretty-printed JSON.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_the_default() {
        let config = RuntimeConfig::from_json("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn nested_sections_keep_their_defaults() {
        let config = RuntimeConfig::from_json(
            r#"{ "scheduler": { "frame_interval_ms": 33 }, "models": { "renderable_batch_size": 8 } }"#,
        )
        .unwrap();

        assert_eq!(config.scheduler.frame_interval_ms, 33);
        assert_eq!(config.models.renderable_batch_size, 8);
        assert_eq!(config.models.resources_per_tick, 16);
        assert!(config.create_default_light);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = RuntimeConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = RuntimeConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"), "{err}");
    }
}
