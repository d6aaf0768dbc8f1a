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

/// A color in linear RGBA space.
///
/// Light colors are handed to the render engine in linear space. Colors coming
/// from the UI layer are usually sRGB hex strings, see [`LinearRgba::from_hex`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Creates a new color from linear components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque color from linear RGB components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parses an sRGB hex string (`#RRGGBB` or `#RRGGBBAA`, `#` optional).
    ///
    /// The RGB channels are converted to linear space, alpha is kept as is.
    /// Returns `None` when the string is not a valid hex color.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Some(Self::new(
            srgb_to_linear(channel(0)?),
            srgb_to_linear(channel(2)?),
            srgb_to_linear(channel(4)?),
            a,
        ))
    }
}

impl Default for LinearRgba {
    fn default() -> Self {
        Self::WHITE
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hex_white_and_black() {
        assert_eq!(LinearRgba::from_hex("#FFFFFF"), Some(LinearRgba::WHITE));
        assert_eq!(LinearRgba::from_hex("000000"), Some(LinearRgba::BLACK));
    }

    #[test]
    fn hex_with_alpha() {
        let c = LinearRgba::from_hex("#FFFFFF80").unwrap();
        assert_relative_eq!(c.a, 128.0 / 255.0, epsilon = 1e-6);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(LinearRgba::from_hex("#FFF").is_none());
        assert!(LinearRgba::from_hex("#GGGGGG").is_none());
    }
}
