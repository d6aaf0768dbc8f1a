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

//! Asset I/O for Prism.
//!
//! Loading a model goes through three stages, each behind its own seam:
//!
//! 1. an [`AssetFetcher`] turns an [`AssetLocation`](prism_core::asset::AssetLocation)
//!    into bytes (local file or HTTP),
//! 2. an [`AssetDecoder`] turns the bytes into a [`DecodedAsset`] describing
//!    primitives, streamed resources and animation clips,
//! 3. an [`AssetInstance`] tracks one engine instance of that asset while its
//!    renderables are promoted into the scene over several ticks.
//!
//! Callers are notified through a [`LoadFuture`].

mod decode;
mod error;
mod fetch;
mod future;
mod instance;

pub use decode::{AssetDecoder, DecodedAsset, GltfDecoder, ResourceInfo, ResourceKind};
pub use error::AssetLoadError;
pub use fetch::{AssetFetcher, DefaultFetcher, FileFetcher, HttpFetcher};
pub use future::{LoadFuture, LoadPromise, LoadResult, LoadStatus};
pub use instance::AssetInstance;
