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
use prism_io::DecodedAsset;
use std::sync::Arc;

/// A decoded asset known to the engine.
///
/// Templates stay resident until shutdown and are shared by every model of
/// the same location. Other records belong to a single instance and are
/// destroyed with it.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    /// Where the asset was read from.
    pub location: AssetLocation,
    /// The engine asset instances are created from.
    pub engine_handle: EngineHandle,
    /// Kept resident and shared.
    pub is_template: bool,
    /// The decoded description.
    pub asset: Arc<DecodedAsset>,
}

impl AssetRecord {
    /// A resident, shared record.
    pub fn template(engine_handle: EngineHandle, asset: Arc<DecodedAsset>) -> Self {
        Self {
            location: asset.location.clone(),
            engine_handle,
            is_template: true,
            asset,
        }
    }

    /// A record owned by one instance.
    pub fn owned(engine_handle: EngineHandle, asset: Arc<DecodedAsset>) -> Self {
        Self {
            is_template: false,
            ..Self::template(engine_handle, asset)
        }
    }

    /// The key templates are stored under.
    pub fn key(&self) -> &str {
        self.location.key()
    }
}
