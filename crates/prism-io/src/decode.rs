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

//! Turning asset bytes into a description the engine can instantiate.

use crate::{AssetFetcher, AssetLoadError};
use base64::Engine;
use prism_core::asset::{AnimationClip, AssetLocation, PrimitiveDesc};

/// The kind of a streamed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Vertex, index or animation data.
    Buffer,
    /// A texture image.
    Image,
}

/// A resource the engine streams in after the asset is instantiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    /// Buffer or image.
    pub kind: ResourceKind,
    /// Size of the resource data.
    pub byte_len: usize,
}

/// The decoded form of an asset, shared by every instance created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAsset {
    /// Where the asset was loaded from.
    pub location: AssetLocation,
    /// One entry per renderable to create.
    pub primitives: Vec<PrimitiveDesc>,
    /// Resources streamed after instantiation.
    pub resources: Vec<ResourceInfo>,
    /// Animation clips, in document order.
    pub clips: Vec<AnimationClip>,
}

/// Decodes raw asset bytes.
pub trait AssetDecoder: Send + Sync {
    /// Decodes `bytes` read from `location`. External resources are read
    /// through `fetcher`.
    fn decode(
        &self,
        location: &AssetLocation,
        bytes: &[u8],
        fetcher: &dyn AssetFetcher,
    ) -> Result<DecodedAsset, AssetLoadError>;
}

/// Decodes glTF 2.0 assets, both `.gltf` and binary `.glb`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfDecoder;

impl GltfDecoder {
    fn decode_data_uri(uri: &str) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        let (_, payload) = uri.strip_prefix("data:")?.split_once(";base64,")?;
        Some(base64::engine::general_purpose::STANDARD.decode(payload))
    }

    fn resolve_uri(
        location: &AssetLocation,
        uri: &str,
        fetcher: &dyn AssetFetcher,
    ) -> Result<usize, AssetLoadError> {
        match Self::decode_data_uri(uri) {
            Some(decoded) => decoded.map(|bytes| bytes.len()).map_err(|e| AssetLoadError::Decode {
                source_name: location.key().to_owned(),
                reason: format!("invalid data URI: {e}"),
            }),
            None => fetcher.fetch_relative(location, uri).map(|bytes| bytes.len()),
        }
    }

    fn clip(animation: &gltf::Animation<'_>) -> AnimationClip {
        let duration_secs = animation
            .channels()
            .filter_map(|channel| channel.sampler().input().max())
            .filter_map(|max| max.as_array()?.first()?.as_f64())
            .fold(0.0f64, f64::max) as f32;
        AnimationClip {
            name: animation
                .name()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("animation_{}", animation.index())),
            duration_secs,
        }
    }
}

impl AssetDecoder for GltfDecoder {
    fn decode(
        &self,
        location: &AssetLocation,
        bytes: &[u8],
        fetcher: &dyn AssetFetcher,
    ) -> Result<DecodedAsset, AssetLoadError> {
        let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| AssetLoadError::Decode {
            source_name: location.key().to_owned(),
            reason: e.to_string(),
        })?;
        let document = &gltf.document;

        let primitives: Vec<PrimitiveDesc> = document
            .meshes()
            .flat_map(|mesh| {
                let mesh_index = mesh.index();
                let name = mesh.name().map(str::to_owned);
                mesh.primitives().map(move |primitive| PrimitiveDesc {
                    mesh_index,
                    primitive_index: primitive.index(),
                    name: name.clone(),
                })
            })
            .collect();
        if primitives.is_empty() {
            return Err(AssetLoadError::NotAModel(location.key().to_owned()));
        }

        let mut resources = Vec::new();
        for buffer in document.buffers() {
            let byte_len = match buffer.source() {
                gltf::buffer::Source::Bin => gltf
                    .blob
                    .as_ref()
                    .map(Vec::len)
                    .ok_or_else(|| AssetLoadError::Decode {
                        source_name: location.key().to_owned(),
                        reason: "binary chunk referenced but missing".into(),
                    })?,
                gltf::buffer::Source::Uri(uri) => Self::resolve_uri(location, uri, fetcher)?,
            };
            resources.push(ResourceInfo {
                kind: ResourceKind::Buffer,
                byte_len,
            });
        }
        for image in document.images() {
            let byte_len = match image.source() {
                gltf::image::Source::View { view, .. } => view.length(),
                gltf::image::Source::Uri { uri, .. } => Self::resolve_uri(location, uri, fetcher)?,
            };
            resources.push(ResourceInfo {
                kind: ResourceKind::Image,
                byte_len,
            });
        }

        let clips = document.animations().map(|a| Self::clip(&a)).collect();

        let decoded = DecodedAsset {
            location: location.clone(),
            primitives,
            resources,
            clips,
        };
        log::debug!(
            "Decoded {}: {} primitive(s), {} resource(s), {} clip(s)",
            location,
            decoded.primitives.len(),
            decoded.resources.len(),
            decoded.clips.len()
        );
        Ok(decoded)
    }
}
