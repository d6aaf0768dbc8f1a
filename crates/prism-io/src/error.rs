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

use thiserror::Error;

/// Why an asset failed to load.
///
/// Carried by value inside a resolved [`LoadFuture`](crate::LoadFuture), so it
/// keeps only owned strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetLoadError {
    /// A local file could not be read.
    #[error("failed to read '{path}': {reason}")]
    Io {
        /// The path that was read.
        path: String,
        /// The underlying error.
        reason: String,
    },

    /// A remote resource could not be fetched.
    #[error("failed to fetch '{url}': {reason}")]
    Network {
        /// The requested URL.
        url: String,
        /// The underlying error.
        reason: String,
    },

    /// The bytes are not a valid asset.
    #[error("failed to decode '{source_name}': {reason}")]
    Decode {
        /// The asset being decoded.
        source_name: String,
        /// What went wrong.
        reason: String,
    },

    /// The asset decoded but contains nothing to render.
    #[error("'{0}' contains no mesh")]
    NotAModel(String),

    /// The render engine refused to instantiate the asset.
    #[error("the render engine rejected '{source_name}': {reason}")]
    Engine {
        /// The asset being instantiated.
        source_name: String,
        /// What the engine reported.
        reason: String,
    },

    /// The model system is not registered or was shut down.
    #[error("the model system is not available")]
    SystemUnavailable,

    /// The load was dropped before completing.
    #[error("the load was abandoned before completing")]
    Abandoned,
}
