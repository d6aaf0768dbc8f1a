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

//! Streaming state of one engine instance of an asset.

use crate::DecodedAsset;
use prism_core::renderer::EngineHandle;
use std::collections::VecDeque;
use std::sync::Arc;

/// An engine instance whose renderables are promoted into the scene over
/// several ticks while its resources stream in.
#[derive(Debug)]
pub struct AssetInstance {
    handle: EngineHandle,
    asset: Arc<DecodedAsset>,
    ready: VecDeque<EngineHandle>,
    added: Vec<EngineHandle>,
    resources_loaded: usize,
}

impl AssetInstance {
    /// Tracks `handle`, whose renderables were created and await promotion.
    pub fn new(
        handle: EngineHandle,
        asset: Arc<DecodedAsset>,
        renderables: impl IntoIterator<Item = EngineHandle>,
    ) -> Self {
        Self {
            handle,
            asset,
            ready: renderables.into_iter().collect(),
            added: Vec::new(),
            resources_loaded: 0,
        }
    }

    /// The engine instance.
    pub fn handle(&self) -> EngineHandle {
        self.handle
    }

    /// The asset this instance was created from.
    pub fn asset(&self) -> &Arc<DecodedAsset> {
        &self.asset
    }

    /// Streams up to `budget` more resources.
    pub fn advance_streaming(&mut self, budget: usize) {
        self.resources_loaded = (self.resources_loaded + budget).min(self.resources_total());
    }

    /// Resources streamed so far.
    pub fn resources_loaded(&self) -> usize {
        self.resources_loaded
    }

    /// Resources to stream in total.
    pub fn resources_total(&self) -> usize {
        self.asset.resources.len()
    }

    /// Fraction of streamed resources, from 0 to 1.
    pub fn progress(&self) -> f32 {
        match self.resources_total() {
            0 => 1.0,
            total => self.resources_loaded as f32 / total as f32,
        }
    }

    /// Takes at most `max` renderables ready to enter the scene.
    pub fn pop_renderables(&mut self, max: usize) -> Vec<EngineHandle> {
        let count = max.min(self.ready.len());
        let batch: Vec<_> = self.ready.drain(..count).collect();
        self.added.extend_from_slice(&batch);
        batch
    }

    /// Renderables not yet handed out.
    pub fn pending_renderables(&self) -> usize {
        self.ready.len()
    }

    /// Renderables handed out so far.
    pub fn added_renderables(&self) -> &[EngineHandle] {
        &self.added
    }

    /// Returns `true` once every resource streamed and every renderable was
    /// handed out.
    pub fn is_fully_loaded(&self) -> bool {
        self.ready.is_empty() && self.resources_loaded == self.resources_total()
    }
}
