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

//! Descriptors shared by the asset pipeline, the ECS components and the
//! render engine.
//!
//! Nothing in here loads or decodes anything; see `prism-io` for that.

use std::fmt;

/// Where an asset comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetLocation {
    /// A path on the local file system, relative to the asset root or absolute.
    Path(String),
    /// A remote resource fetched over HTTP(S).
    Url(String),
}

impl AssetLocation {
    /// The string used to deduplicate requests for the same asset.
    pub fn key(&self) -> &str {
        match self {
            AssetLocation::Path(path) => path,
            AssetLocation::Url(url) => url,
        }
    }

    /// Returns `true` for remote locations.
    pub fn is_remote(&self) -> bool {
        matches!(self, AssetLocation::Url(_))
    }
}

impl fmt::Display for AssetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLocation::Path(path) => write!(f, "file '{path}'"),
            AssetLocation::Url(url) => write!(f, "url '{url}'"),
        }
    }
}

/// One drawable primitive of a decoded asset.
///
/// Each primitive becomes one renderable entity in the engine once the asset
/// is instantiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveDesc {
    /// Index of the mesh inside the source document.
    pub mesh_index: usize,
    /// Index of the primitive inside its mesh.
    pub primitive_index: usize,
    /// Name of the owning mesh, if the document provides one.
    pub name: Option<String>,
}

/// An animation clip exposed by a decoded asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Clip name, or a generated `animation_<index>` name.
    pub name: String,
    /// Clip length in seconds.
    pub duration_secs: f32,
}

/// The collision volume attached to a model once it is fully loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    /// Axis-aligned box described by half extents.
    Box {
        /// Half size along each axis.
        half_extents: crate::math::Vec3,
    },
    /// Sphere of the given radius.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },
    /// Let the engine derive the volume from the instance's bounding boxes.
    MeshBounds,
}

impl Default for CollisionShape {
    fn default() -> Self {
        CollisionShape::MeshBounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_key_ignores_kind() {
        let path = AssetLocation::Path("models/a.glb".into());
        let url = AssetLocation::Url("https://host/a.glb".into());
        assert_eq!(path.key(), "models/a.glb");
        assert!(!path.is_remote());
        assert!(url.is_remote());
        assert_eq!(url.to_string(), "url 'https://host/a.glb'");
    }
}
