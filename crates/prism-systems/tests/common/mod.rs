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

#![allow(dead_code)]

use prism_core::asset::AssetLocation;
use prism_core::renderer::HeadlessEngine;
use prism_ecs::{EcsContext, Entity, Model, ModelState};
use prism_io::{AssetFetcher, AssetLoadError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FRAME: Duration = Duration::from_millis(16);

const ZEROES_40: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA==";

/// A self-contained glTF document: one mesh with `primitives` triangles and
/// one 1.5 s animation named "slide".
pub fn model_gltf(primitives: usize) -> Vec<u8> {
    let primitive_list = vec![r#"{"attributes":{"POSITION":0}}"#; primitives].join(",");
    format!(
        r#"{{
  "asset": {{"version": "2.0"}},
  "buffers": [{{"byteLength": 40, "uri": "data:application/octet-stream;base64,{ZEROES_40}"}}],
  "bufferViews": [
    {{"buffer": 0, "byteOffset": 0, "byteLength": 36}},
    {{"buffer": 0, "byteOffset": 36, "byteLength": 4}}
  ],
  "accessors": [
    {{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0]}},
    {{"bufferView": 1, "componentType": 5126, "count": 1, "type": "SCALAR", "min": [1.5], "max": [1.5]}},
    {{"bufferView": 0, "componentType": 5126, "count": 1, "type": "VEC3"}}
  ],
  "meshes": [{{"name": "model", "primitives": [{primitive_list}]}}],
  "nodes": [{{"mesh": 0}}],
  "animations": [{{
    "name": "slide",
    "channels": [{{"sampler": 0, "target": {{"node": 0, "path": "translation"}}}}],
    "samplers": [{{"input": 1, "output": 2}}]
  }}]
}}"#
    )
    .into_bytes()
}

/// Serves assets from memory.
#[derive(Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(key.to_owned(), bytes.into());
        self
    }

    pub fn shared(self) -> Arc<dyn AssetFetcher> {
        Arc::new(self)
    }
}

impl AssetFetcher for MemoryFetcher {
    fn fetch(&self, location: &AssetLocation) -> Result<Vec<u8>, AssetLoadError> {
        self.files
            .get(location.key())
            .cloned()
            .ok_or_else(|| AssetLoadError::Io {
                path: location.key().to_owned(),
                reason: "not found".into(),
            })
    }

    fn fetch_relative(&self, base: &AssetLocation, uri: &str) -> Result<Vec<u8>, AssetLoadError> {
        Err(AssetLoadError::Io {
            path: format!("{}/{}", base.key(), uri),
            reason: "not found".into(),
        })
    }
}

/// A manual context over a fresh headless engine.
pub fn manual_context() -> (Arc<Mutex<HeadlessEngine>>, EcsContext) {
    let (engine, shared) = HeadlessEngine::shared();
    (engine, EcsContext::manual(shared))
}

/// An entity carrying a model that keeps its asset resident.
pub fn shared_model(name: &str, path: &str) -> Entity {
    let entity = Entity::new(name);
    entity.attach_component(Model::shared(AssetLocation::Path(path.into())));
    entity
}

pub fn model_state(entity: &Entity) -> Option<ModelState> {
    entity.with_component(|model: &Model| model.state.clone())
}
