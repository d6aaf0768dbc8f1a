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

//! Views, quality presets and camera descriptions.

use crate::math::{Vec3, FRAC_PI_2};

/// Quality presets a view can be switched between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewQuality {
    /// Every optional effect off.
    Low,
    /// The default preset.
    #[default]
    Medium,
    /// Anti-aliasing and ambient occlusion on.
    High,
    /// Every effect on at full resolution.
    Ultra,
}

impl ViewQuality {
    /// Expands the preset into concrete view settings.
    pub fn settings(self) -> ViewSettings {
        match self {
            ViewQuality::Low => ViewSettings {
                msaa_samples: 1,
                dynamic_resolution: true,
                ambient_occlusion: false,
                bloom: false,
                shadows: false,
            },
            ViewQuality::Medium => ViewSettings {
                msaa_samples: 1,
                dynamic_resolution: true,
                ambient_occlusion: false,
                bloom: true,
                shadows: true,
            },
            ViewQuality::High => ViewSettings {
                msaa_samples: 4,
                dynamic_resolution: false,
                ambient_occlusion: true,
                bloom: true,
                shadows: true,
            },
            ViewQuality::Ultra => ViewSettings {
                msaa_samples: 8,
                dynamic_resolution: false,
                ambient_occlusion: true,
                bloom: true,
                shadows: true,
            },
        }
    }
}

/// Per-view rendering options handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    /// MSAA sample count, 1 disables it.
    pub msaa_samples: u32,
    /// Let the engine scale the render resolution under load.
    pub dynamic_resolution: bool,
    /// Screen-space ambient occlusion.
    pub ambient_occlusion: bool,
    /// Bloom post-process.
    pub bloom: bool,
    /// Shadow mapping.
    pub shadows: bool,
}

/// How a view's camera is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraMode {
    /// Orbit around the target, driven by explicit orbit updates.
    #[default]
    Orbit,
    /// Orbit around the target, yaw advances by itself every tick.
    AutoOrbit,
    /// The camera does not move.
    Fixed,
}

/// Spherical coordinates of an orbiting camera around its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOrbit {
    /// Rotation around the world up axis, in radians.
    pub yaw: f32,
    /// Elevation above the horizon, in radians.
    pub pitch: f32,
    /// Distance to the target.
    pub distance: f32,
    /// The point being looked at.
    pub target: Vec3,
}

impl CameraOrbit {
    /// Keeps the camera from flipping over the poles.
    const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

    /// Returns a copy with pitch clamped and distance kept positive.
    pub fn clamped(self) -> Self {
        Self {
            pitch: self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT),
            distance: self.distance.max(0.01),
            ..self
        }
    }

    /// Converts the orbit into a camera pose.
    pub fn pose(&self) -> CameraPose {
        let orbit = self.clamped();
        let (sin_yaw, cos_yaw) = orbit.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = orbit.pitch.sin_cos();
        let offset = Vec3::new(
            orbit.distance * cos_pitch * sin_yaw,
            orbit.distance * sin_pitch,
            orbit.distance * cos_pitch * cos_yaw,
        );
        CameraPose {
            position: orbit.target + offset,
            target: orbit.target,
            ..CameraPose::default()
        }
    }
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 4.0,
            target: Vec3::ZERO,
        }
    }
}

/// A resolved camera placement and projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position.
    pub position: Vec3,
    /// Look-at point.
    pub target: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical field of view, in radians.
    pub fov_y: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 4.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45f32.to_radians(),
            near: 0.05,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orbit_pose_keeps_distance_to_target() {
        let orbit = CameraOrbit {
            yaw: 0.7,
            pitch: 0.3,
            distance: 6.0,
            target: Vec3::new(1.0, 2.0, 3.0),
        };
        let pose = orbit.pose();
        assert_relative_eq!(pose.position.distance(pose.target), 6.0, epsilon = 1e-4);
    }

    #[test]
    fn orbit_pitch_is_clamped() {
        let orbit = CameraOrbit {
            pitch: 10.0,
            distance: -1.0,
            ..CameraOrbit::default()
        }
        .clamped();
        assert!(orbit.pitch < FRAC_PI_2);
        assert!(orbit.distance > 0.0);
    }

    #[test]
    fn higher_presets_enable_more_effects() {
        assert!(!ViewQuality::Low.settings().shadows);
        assert_eq!(ViewQuality::Ultra.settings().msaa_samples, 8);
        assert_eq!(ViewQuality::default(), ViewQuality::Medium);
    }
}
