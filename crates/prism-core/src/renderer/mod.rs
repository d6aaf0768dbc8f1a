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

//! The contract between the runtime and the external render engine.
//!
//! The runtime never draws anything itself. Systems describe what they need
//! (lights, primitive shapes, model instances, views) with the descriptors in
//! this module and hand them to a [`RenderEngine`]. The engine answers with
//! opaque [`EngineHandle`]s that the components keep until they are destroyed.
//!
//! [`HeadlessEngine`] records every call and is what tests and the sandbox
//! binary run against.

mod engine;
mod error;
mod handle;
mod headless;
pub mod light;
pub mod shape;
pub mod view;

pub use self::engine::{RenderEngine, SharedEngine};
pub use self::error::RenderEngineError;
pub use self::handle::EngineHandle;
pub use self::headless::{HeadlessEngine, HeadlessObject, HeadlessView};
pub use self::light::{LightDescriptor, LightKind, DEFAULT_LIGHT_INTENSITY};
pub use self::shape::{ShapeDescriptor, ShapeKind};
pub use self::view::{CameraMode, CameraOrbit, CameraPose, ViewQuality, ViewSettings};
