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

//! Light descriptors.
//!
//! A light is rebuilt from its descriptor every time one of its parameters
//! changes, so the descriptor is the single source of truth for the engine.

use crate::math::{LinearRgba, Vec3};

/// Illuminance of the default sun-like light, in lux.
pub const DEFAULT_LIGHT_INTENSITY: f32 = 100_000.0;

/// The kind of light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// A directional light with a visible sun disk.
    Sun,
    /// An infinitely distant light with parallel rays and no falloff.
    Directional,
    /// An omnidirectional light attenuated by `falloff_radius`.
    Point,
    /// A cone-shaped light.
    Spot {
        /// Angle of the fully lit inner cone, in radians.
        inner_cone: f32,
        /// Angle of the outer cone where the light reaches zero, in radians.
        outer_cone: f32,
    },
}

impl LightKind {
    /// Returns `true` for kinds whose position matters.
    pub fn is_positional(&self) -> bool {
        matches!(self, LightKind::Point | LightKind::Spot { .. })
    }
}

/// Everything the engine needs to build a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightDescriptor {
    /// The light kind.
    pub kind: LightKind,
    /// Color in linear space.
    pub color: LinearRgba,
    /// Intensity in lux for directional kinds, in lumens otherwise.
    pub intensity: f32,
    /// Direction the light points to. Ignored by point lights.
    pub direction: Vec3,
    /// World position. Ignored by directional kinds.
    pub position: Vec3,
    /// Distance at which positional lights stop contributing.
    pub falloff_radius: f32,
    /// Whether the light casts shadows.
    pub cast_shadows: bool,
}

impl Default for LightDescriptor {
    /// A white directional light shining straight down.
    fn default() -> Self {
        Self {
            kind: LightKind::Directional,
            color: LinearRgba::WHITE,
            intensity: DEFAULT_LIGHT_INTENSITY,
            direction: Vec3::NEG_Y,
            position: Vec3::ZERO,
            falloff_radius: 1.0,
            cast_shadows: true,
        }
    }
}
