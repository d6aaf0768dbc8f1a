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

//! Primitive shape descriptors. The engine owns the geometry generation.

use crate::math::{LinearRgba, Transform};

/// The primitive to generate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    /// A unit cube centered on the origin.
    Cube,
    /// A unit-radius UV sphere.
    Sphere {
        /// Horizontal subdivisions.
        stacks: u32,
        /// Vertical subdivisions.
        slices: u32,
    },
    /// A unit plane facing +Y.
    Plane,
}

/// A primitive shape to build in the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDescriptor {
    /// The primitive kind.
    pub kind: ShapeKind,
    /// Initial world transform.
    pub transform: Transform,
    /// Base color of the default material.
    pub color: LinearRgba,
    /// Render both faces of every triangle.
    pub double_sided: bool,
    /// Whether the shape casts shadows.
    pub cast_shadows: bool,
    /// Whether the shape receives shadows.
    pub receive_shadows: bool,
}

impl ShapeDescriptor {
    /// A descriptor for `kind` with default material settings.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            transform: Transform::IDENTITY,
            color: LinearRgba::WHITE,
            double_sided: false,
            cast_shadows: true,
            receive_shadows: true,
        }
    }
}
