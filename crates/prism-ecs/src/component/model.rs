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

use prism_core::asset::AssetLocation;
use prism_core::renderer::EngineHandle;

/// Load state of a [`Model`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelState {
    /// No load was requested.
    #[default]
    Unloaded,
    /// The asset is being read and decoded for this model.
    Loading,
    /// Waiting on a load started for another model with the same path.
    Queued,
    /// An instance exists in the engine.
    Loaded,
    /// The load failed with the given reason.
    Failed(String),
}

/// A model instantiated from a glTF asset.
#[derive(Debug, Default)]
pub struct Model {
    /// Where the asset comes from.
    pub location: Option<AssetLocation>,
    /// Keep the decoded asset resident and share it between models.
    pub keep_in_memory: bool,
    /// Current load state.
    pub state: ModelState,
    /// The engine instance, once attached.
    pub instance: Option<EngineHandle>,
}

impl Model {
    /// A model that has not been loaded yet.
    pub fn new(location: AssetLocation) -> Self {
        Self {
            location: Some(location),
            ..Self::default()
        }
    }

    /// Same as [`Model::new`] with template retention enabled.
    pub fn shared(location: AssetLocation) -> Self {
        Self {
            keep_in_memory: true,
            ..Self::new(location)
        }
    }

    /// Returns `true` once an engine instance is attached.
    pub fn is_loaded(&self) -> bool {
        self.state == ModelState::Loaded
    }
}

impl Clone for Model {
    fn clone(&self) -> Self {
        Self {
            location: self.location.clone(),
            keep_in_memory: self.keep_in_memory,
            state: ModelState::Unloaded,
            instance: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_starts_unloaded() {
        let mut model = Model::shared(AssetLocation::Path("a.glb".into()));
        model.state = ModelState::Loaded;
        model.instance = Some(EngineHandle::new(3));

        let copy = model.clone();
        assert!(copy.keep_in_memory);
        assert_eq!(copy.state, ModelState::Unloaded);
        assert_eq!(copy.instance, None);
    }
}
