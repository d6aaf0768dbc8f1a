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

use crate::guid::Guid;
use crate::math::{LinearRgba, Transform, Vec3};
use crate::renderer::{CameraMode, CameraOrbit, ViewQuality};

/// A strongly typed payload attached to a [`MessageType`](super::MessageType) key.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageValue {
    /// No payload, the key itself is the command.
    Unit,
    /// An entity identifier.
    Guid(Guid),
    /// A signed integer (indices, counts).
    Int(i64),
    /// A scalar value.
    Float(f32),
    /// A flag.
    Bool(bool),
    /// A vector (direction, position).
    Vec3(Vec3),
    /// A linear color.
    Color(LinearRgba),
    /// A size in physical pixels.
    Size {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// An offset in physical pixels.
    Offset {
        /// Horizontal offset.
        x: i32,
        /// Vertical offset.
        y: i32,
    },
    /// A full transform.
    Transform(Transform),
    /// A view quality preset.
    ViewQuality(ViewQuality),
    /// A camera mode.
    CameraMode(CameraMode),
    /// Orbit camera parameters.
    Orbit(CameraOrbit),
    /// Free-form text.
    Text(String),
}

/// Conversion from a [`MessageValue`] into a concrete payload type.
///
/// Returns `None` when the value holds a different variant.
pub trait FromMessageValue: Sized {
    /// Extracts `Self` from the value.
    fn from_message_value(value: &MessageValue) -> Option<Self>;
}

macro_rules! impl_from_message_value {
    ($ty:ty, $variant:ident) => {
        impl FromMessageValue for $ty {
            fn from_message_value(value: &MessageValue) -> Option<Self> {
                match value {
                    MessageValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }

        impl From<$ty> for MessageValue {
            fn from(value: $ty) -> Self {
                MessageValue::$variant(value)
            }
        }
    };
}

impl_from_message_value!(Guid, Guid);
impl_from_message_value!(i64, Int);
impl_from_message_value!(bool, Bool);
impl_from_message_value!(Vec3, Vec3);
impl_from_message_value!(LinearRgba, Color);
impl_from_message_value!(Transform, Transform);
impl_from_message_value!(ViewQuality, ViewQuality);
impl_from_message_value!(CameraMode, CameraMode);
impl_from_message_value!(CameraOrbit, Orbit);
impl_from_message_value!(String, Text);

impl FromMessageValue for f32 {
    fn from_message_value(value: &MessageValue) -> Option<Self> {
        match value {
            MessageValue::Float(v) => Some(*v),
            MessageValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }
}

impl From<f32> for MessageValue {
    fn from(value: f32) -> Self {
        MessageValue::Float(value)
    }
}

/// Indices are carried as `Int`; negative values do not convert.
impl FromMessageValue for usize {
    fn from_message_value(value: &MessageValue) -> Option<Self> {
        match value {
            MessageValue::Int(v) => usize::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl From<usize> for MessageValue {
    fn from(value: usize) -> Self {
        MessageValue::Int(value as i64)
    }
}

impl From<&str> for MessageValue {
    fn from(value: &str) -> Self {
        MessageValue::Text(value.to_owned())
    }
}
