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

/// Every key a [`Message`](super::Message) can carry.
///
/// The variant order is the dispatch order of handlers across types inside a
/// single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageType {
    // --- Addressing ---
    /// GUID of the entity the command targets. Payload: `Guid`.
    EntityGuid,
    /// Index of the view target the command targets. Payload: `Int`.
    ViewIndex,

    // --- Lights ---
    /// Create the default directional light. Payload: `Unit`.
    CreateDefaultLight,
    /// Change a light's color. Payload: `Color`.
    ChangeLightColor,
    /// Change a light's intensity. Payload: `Float`.
    ChangeLightIntensity,
    /// Change a light's direction. Payload: `Vec3`.
    ChangeLightDirection,
    /// Change a light's position. Payload: `Vec3`.
    ChangeLightPosition,
    /// Change a light's falloff radius. Payload: `Float`.
    ChangeLightFalloff,
    /// Enable or disable a light. Payload: `Bool`.
    ToggleLight,

    // --- Animation ---
    /// Append a clip to the play queue. Payload: `Int` (clip index).
    AnimationEnqueue,
    /// Clear the play queue. Payload: `Unit`.
    AnimationClearQueue,
    /// Play a clip immediately. Payload: `Int` (clip index).
    AnimationPlay,
    /// Pause playback. Payload: `Unit`.
    AnimationPause,
    /// Resume paused playback. Payload: `Unit`.
    AnimationResume,
    /// Change the playback speed. Payload: `Float`.
    AnimationChangeSpeed,
    /// Enable or disable looping. Payload: `Bool`.
    AnimationSetLooping,

    // --- Shapes & transforms ---
    /// Add or remove every shape from the scene. Payload: `Bool`.
    ToggleShapesInScene,
    /// Show or hide a single shape. Payload: `Bool`.
    SetShapeVisibility,
    /// Replace an entity's transform. Payload: `Transform`.
    ChangeTransform,

    // --- View targets ---
    /// Resize a view target. Payload: `Size`.
    ResizeViewTarget,
    /// Move a view target inside the host surface. Payload: `Offset`.
    ChangeViewOffset,
    /// Change a view target's quality preset. Payload: `ViewQuality`.
    ChangeViewQuality,
    /// Change a view target's camera mode. Payload: `CameraMode`.
    ChangeCameraMode,
    /// Change a view target's orbit parameters. Payload: `Orbit`.
    ChangeCameraOrbit,
}
