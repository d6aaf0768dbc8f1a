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

//! Math primitives carried by messages and render-engine descriptors.
//!
//! The runtime never does heavy linear algebra itself; the render engine owns
//! matrices and projections. What lives here is the small vocabulary used to
//! describe lights, cameras and transforms. Angles are in **radians** unless a
//! name says otherwise.

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, PI, TAU};

mod color;
mod quaternion;
mod transform;
mod vector;

pub use self::color::LinearRgba;
pub use self::quaternion::Quaternion;
pub use self::transform::Transform;
pub use self::vector::Vec3;
