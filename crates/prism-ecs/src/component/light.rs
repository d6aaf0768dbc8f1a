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

use prism_core::renderer::{EngineHandle, LightDescriptor, LightKind};

/// A light source attached to an entity.
///
/// The engine-side light is rebuilt from `params` whenever they change.
#[derive(Debug)]
pub struct Light {
    /// The parameters the engine light is built from.
    pub params: LightDescriptor,
    /// Disabled lights stay alive in the engine but are out of the scene.
    pub enabled: bool,
    /// The engine light, once built.
    pub handle: Option<EngineHandle>,
}

impl Light {
    /// Creates an enabled light that is not built yet.
    pub fn new(params: LightDescriptor) -> Self {
        Self {
            params,
            enabled: true,
            handle: None,
        }
    }

    /// A default directional light.
    pub fn directional() -> Self {
        Self::new(LightDescriptor::default())
    }

    /// A default point light.
    pub fn point() -> Self {
        Self::new(LightDescriptor {
            kind: LightKind::Point,
            ..LightDescriptor::default()
        })
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::directional()
    }
}

impl Clone for Light {
    fn clone(&self) -> Self {
        Self {
            params: self.params,
            enabled: self.enabled,
            handle: None,
        }
    }
}
