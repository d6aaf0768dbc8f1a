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

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration of the [`ModelSystem`](super::ModelSystem).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSystemConfig {
    /// Most renderables one instance adds to the scene per tick.
    pub renderable_batch_size: usize,
    /// Resources one instance streams per tick.
    pub resources_per_tick: usize,
    /// Directory relative asset paths are resolved against.
    pub asset_root: PathBuf,
    /// Timeout of remote asset downloads, in seconds.
    pub http_timeout_secs: u64,
}

impl ModelSystemConfig {
    /// The per-tick renderable bound. Never zero.
    pub fn batch_size(&self) -> usize {
        self.renderable_batch_size.max(1)
    }

    /// The download timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for ModelSystemConfig {
    fn default() -> Self {
        Self {
            renderable_batch_size: 128,
            resources_per_tick: 16,
            asset_root: PathBuf::from("."),
            http_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: ModelSystemConfig =
            serde_json::from_str(r#"{ "renderable_batch_size": 32 }"#).unwrap();
        assert_eq!(config.batch_size(), 32);
        assert_eq!(config.resources_per_tick, 16);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn zero_batch_still_makes_progress() {
        let config = ModelSystemConfig {
            renderable_batch_size: 0,
            ..ModelSystemConfig::default()
        };
        assert_eq!(config.batch_size(), 1);
    }
}
